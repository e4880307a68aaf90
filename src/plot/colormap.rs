//! Continuous colormaps and categorical palettes.

use plotters::style::RGBColor;

/// Continuous colormap from `[0, 1]` to RGB.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ColorMap {
    /// black - purple - red - yellow
    #[default]
    Gnuplot,
    /// diverging blue - gray - red
    Coolwarm,
}

const COOLWARM: [(f64, [f64; 3]); 5] = [
    (0.0, [59.0, 76.0, 192.0]),
    (0.25, [141.0, 176.0, 254.0]),
    (0.5, [221.0, 221.0, 221.0]),
    (0.75, [244.0, 154.0, 123.0]),
    (1.0, [180.0, 4.0, 38.0]),
];

fn to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl ColorMap {
    /// Color at `t`, clamped into `[0, 1]`. NaN maps to the low end.
    pub fn color(self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            ColorMap::Gnuplot => RGBColor(
                to_byte(t.sqrt()),
                to_byte(t.powi(3)),
                to_byte((2.0 * std::f64::consts::PI * t).sin()),
            ),
            ColorMap::Coolwarm => {
                let k = COOLWARM
                    .windows(2)
                    .position(|w| t <= w[1].0)
                    .unwrap_or(COOLWARM.len() - 2);
                let (t0, c0) = COOLWARM[k];
                let (t1, c1) = COOLWARM[k + 1];
                let f = (t - t0) / (t1 - t0);
                let mix = |i: usize| (c0[i] + f * (c1[i] - c0[i])).round() as u8;
                RGBColor(mix(0), mix(1), mix(2))
            }
        }
    }

    /// Color of `value` on the scale `[vmin, vmax]`.
    pub fn scaled(self, value: f64, vmin: f64, vmax: f64) -> RGBColor {
        let span = vmax - vmin;
        if span.abs() < f64::EPSILON {
            return self.color(0.5);
        }
        self.color((value - vmin) / span)
    }
}

const PALETTE_TAB: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const PALETTE_BRIGHT: [RGBColor; 12] = [
    RGBColor(228, 26, 28),
    RGBColor(55, 126, 184),
    RGBColor(77, 175, 74),
    RGBColor(152, 78, 163),
    RGBColor(255, 127, 0),
    RGBColor(166, 86, 40),
    RGBColor(247, 129, 191),
    RGBColor(0, 206, 209),
    RGBColor(128, 128, 0),
    RGBColor(0, 0, 128),
    RGBColor(255, 215, 0),
    RGBColor(0, 100, 0),
];

/// Categorical colors, one per class. Wraps around when exhausted.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Palette {
    #[default]
    Tab,
    Bright,
}

impl Palette {
    pub fn color(self, index: usize) -> RGBColor {
        match self {
            Palette::Tab => PALETTE_TAB[index % PALETTE_TAB.len()],
            Palette::Bright => PALETTE_BRIGHT[index % PALETTE_BRIGHT.len()],
        }
    }
}
