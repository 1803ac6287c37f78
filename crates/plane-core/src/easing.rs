use std::f32::consts::PI;

/// Named progress curves. Each maps [0, 1] onto [0, 1] with fixed endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
    SineIn,
    SineOut,
    SineInOut,
    ExpoOut,
}

impl Ease {
    pub const POWER1_IN_OUT: Ease = Ease::PowerInOut(1);
    pub const POWER2_OUT: Ease = Ease::PowerOut(2);

    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::PowerIn(n) => t.powi(exponent(n)),
            Ease::PowerOut(n) => 1.0 - (1.0 - t).powi(exponent(n)),
            Ease::PowerInOut(n) => {
                let e = exponent(n);
                if t < 0.5 {
                    0.5 * (2.0 * t).powi(e)
                } else {
                    1.0 - 0.5 * (2.0 * (1.0 - t)).powi(e)
                }
            }
            Ease::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Ease::SineOut => (t * PI / 2.0).sin(),
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Ease::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
        }
    }

    /// Parse tween-style names such as `"none"`, `"power2.out"`,
    /// `"power1.inOut"` or `"sine.in"`. A bare `"power2"` means `out`.
    pub fn from_name(name: &str) -> Option<Ease> {
        let name = name.trim();
        let (family, variant) = match name.split_once('.') {
            Some((f, v)) => (f, v),
            None => (name, "out"),
        };
        let variant = match variant {
            "in" | "easeIn" => Variant::In,
            "out" | "easeOut" => Variant::Out,
            "inOut" | "easeInOut" => Variant::InOut,
            _ => return None,
        };
        match family {
            "none" | "linear" => Some(Ease::Linear),
            "power1" | "quad" => Some(power(1, variant)),
            "power2" | "cubic" => Some(power(2, variant)),
            "power3" | "quart" => Some(power(3, variant)),
            "power4" | "quint" => Some(power(4, variant)),
            "sine" => Some(match variant {
                Variant::In => Ease::SineIn,
                Variant::Out => Ease::SineOut,
                Variant::InOut => Ease::SineInOut,
            }),
            "expo" if variant == Variant::Out => Some(Ease::ExpoOut),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Variant {
    In,
    Out,
    InOut,
}

fn power(n: u8, variant: Variant) -> Ease {
    match variant {
        Variant::In => Ease::PowerIn(n),
        Variant::Out => Ease::PowerOut(n),
        Variant::InOut => Ease::PowerInOut(n),
    }
}

// powerN curves are polynomials of degree N + 1
#[inline]
fn exponent(n: u8) -> i32 {
    i32::from(n.clamp(1, 4)) + 1
}
