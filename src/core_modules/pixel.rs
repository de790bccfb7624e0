// THEORY (Pixel Color Space):
// The `pixel` module is the most fundamental unit of the segmentation layer. It holds a
// single RGB sample and knows how to re-express it in HSV, the color space the skin
// thresholds are tuned in. Like every other 1-dimensional heuristic, nothing here looks
// at neighbors or history; spatial cleanup belongs to the `segmenter`.
//
// Units follow the common 8-bit HSV convention so that thresholds tuned on other
// camera tooling carry over unchanged:
// - hue:        0..=179, i.e. the angle on the color wheel in degrees divided by two
// - saturation: 0..=255, chroma relative to value
// - value:      0..=255, the brightest channel
//
// Achromatic samples (chroma of zero) report a hue of 0.

pub mod pixel {
    use serde::{Deserialize, Serialize};

    pub type Channel = u8;
    pub type HueHalfDegrees = u8;
    pub type Saturation = u8;
    pub type Value = u8;

    /// Largest representable hue in half-degree units.
    pub const HUE_MAX: HueHalfDegrees = 179;

    /// A "dumb" data container for a single RGB sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        pub red: Channel,
        pub green: Channel,
        pub blue: Channel,
    }

    /// An HSV triple in 8-bit units.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Hsv {
        pub hue: HueHalfDegrees,
        pub saturation: Saturation,
        pub value: Value,
    }

    impl Hsv {
        pub const fn new(hue: HueHalfDegrees, saturation: Saturation, value: Value) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// HSV Value (V): the brightest channel.
        pub fn value(&self) -> Value {
            self.red.max(self.green.max(self.blue))
        }

        /// Chroma (C): max(R,G,B) - min(R,G,B), in raw channel units.
        pub fn chroma(&self) -> u8 {
            self.value() - self.red.min(self.green.min(self.blue))
        }

        /// HSV Saturation (S): chroma / value, scaled to 0..=255 and rounded.
        pub fn saturation(&self) -> Saturation {
            let value = self.value();
            if value == 0 {
                return 0;
            }
            let saturation = 255.0 * self.chroma() as f32 / value as f32;
            saturation.round() as Saturation
        }

        /// Hue angle in degrees [0, 360).
        pub fn hue_degrees(&self) -> f32 {
            let chroma = self.chroma();
            if chroma == 0 {
                return 0.0;
            }

            let maximum_channel = self.value();
            let inverse_chroma = 1.0 / chroma as f32;
            let (red, green, blue) = (self.red as f32, self.green as f32, self.blue as f32);

            let (base_difference, sector_offset) = if maximum_channel == self.red {
                (green - blue, 0.0)
            } else if maximum_channel == self.green {
                (blue - red, 2.0)
            } else {
                (red - green, 4.0)
            };

            let mut hue_degrees = (base_difference * inverse_chroma + sector_offset) * 60.0;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }
            hue_degrees
        }

        /// Hue in half-degree units (0..=179).
        pub fn hue(&self) -> HueHalfDegrees {
            let half = (self.hue_degrees() / 2.0).round();
            // 359.x degrees rounds up to 180, which wraps back to red.
            if half >= 180.0 { 0 } else { half as HueHalfDegrees }
        }

        pub fn to_hsv(&self) -> Hsv {
            Hsv {
                hue: self.hue(),
                saturation: self.saturation(),
                value: self.value(),
            }
        }
    }
}
