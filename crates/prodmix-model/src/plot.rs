//! Feasible-region plot (SVG output)
//!
//! Each resource limits product B as a function of product A. The feasible region is
//! the area under the pointwise minimum of those two lines, inside the first quadrant.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::adapter::MixSolution;
use crate::params::{MixInputs, RESOURCES};

/// Number of product-A samples along the horizontal axis
pub const SAMPLE_COUNT: usize = 200;

/// Approximate advance of one character at the 11px legend font
const LEGEND_CHAR_WIDTH: f64 = 6.5;
/// Narrowest legend box
const LEGEND_MIN_WIDTH: f64 = 180.0;

/// Error type for plotting operations
#[derive(Error, Debug)]
pub enum PlotError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Only an optimal mix has a point to mark
    #[error("No optimal solution to plot")]
    NoOptimum,
}

/// Result type for plotting operations
pub type PlotResult<T> = Result<T, PlotError>;

/// Boundary of a single resource: `a * x + b * y = capacity`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintLine {
    pub name: String,
    pub capacity: f64,
    /// Consumption per unit of product A
    pub consumption_a: f64,
    /// Consumption per unit of product B
    pub consumption_b: f64,
}

impl ConstraintLine {
    pub fn for_resource(inputs: &MixInputs, resource: usize) -> Self {
        Self {
            name: inputs.resources[resource].name.clone(),
            capacity: inputs.capacity(resource),
            consumption_a: inputs.consumption(0, resource),
            consumption_b: inputs.consumption(1, resource),
        }
    }

    /// Largest product-B quantity this resource allows alongside `x` units of A.
    ///
    /// When product B does not use the resource the limit does not depend on `y`:
    /// it is `+inf` while `x` fits in the capacity and `-inf` once it does not.
    pub fn max_b(&self, x: f64) -> f64 {
        if self.consumption_b == 0.0 {
            if self.consumption_a * x <= self.capacity {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            }
        } else {
            (self.capacity - self.consumption_a * x) / self.consumption_b
        }
    }

    /// `x` of the vertical boundary when product B does not use this resource
    pub fn vertical_at(&self) -> Option<f64> {
        (self.consumption_b == 0.0 && self.consumption_a > 0.0).then(|| self.capacity / self.consumption_a)
    }
}

/// `n` evenly spaced values from `start` to `end`, both included
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Sampled constraint lines and the feasible-region boundary they imply
#[derive(Debug, Clone)]
pub struct FeasibleRegion {
    pub lines: [ConstraintLine; RESOURCES],
    /// Product-A samples, from 0 to the first resource's capacity
    pub xs: Vec<f64>,
    /// `line_values[r][i]` is `lines[r].max_b(xs[i])`
    pub line_values: [Vec<f64>; RESOURCES],
    /// Pointwise minimum of the line values
    pub upper: Vec<f64>,
}

impl FeasibleRegion {
    pub fn derive(inputs: &MixInputs) -> Self {
        let lines = [
            ConstraintLine::for_resource(inputs, 0),
            ConstraintLine::for_resource(inputs, 1),
        ];
        // The first resource's capacity is only a display bound for the A axis
        let xs = linspace(0.0, inputs.capacity(0), SAMPLE_COUNT);
        let line_values = [
            xs.iter().map(|&x| lines[0].max_b(x)).collect::<Vec<_>>(),
            xs.iter().map(|&x| lines[1].max_b(x)).collect::<Vec<_>>(),
        ];
        let upper = line_values[0]
            .iter()
            .zip(&line_values[1])
            .map(|(a, b)| a.min(*b))
            .collect();

        Self {
            lines,
            xs,
            line_values,
            upper,
        }
    }

    /// Whether `(x, y)` lies in the region, within `tolerance`
    pub fn contains(&self, x: f64, y: f64, tolerance: f64) -> bool {
        x >= -tolerance
            && y >= -tolerance
            && self.lines.iter().all(|l| {
                l.consumption_a * x + l.consumption_b * y <= l.capacity + tolerance
            })
    }
}

/// Color for plot elements
#[derive(Debug, Clone, Copy)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    pub const BLUE: Color = Color::new(31, 119, 180);
    pub const ORANGE: Color = Color::new(255, 127, 14);
    pub const RED: Color = Color::new(214, 39, 40);
    pub const LIGHT_GREEN: Color = Color::new(144, 238, 144);
}

/// One color per resource line
pub const LINE_COLORS: [Color; RESOURCES] = [Color::BLUE, Color::ORANGE];

/// Plot configuration
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Plot width in pixels
    pub width: u32,
    /// Plot height in pixels
    pub height: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub title: Option<String>,
    pub show_grid: bool,
    pub line_width: f32,
    pub point_radius: f32,
    /// Opacity of the shaded feasible region
    pub region_opacity: f32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin_left: 80,
            margin_right: 40,
            margin_top: 50,
            margin_bottom: 60,
            title: Some("Feasible region".to_string()),
            show_grid: true,
            line_width: 2.0,
            point_radius: 6.0,
            region_opacity: 0.3,
        }
    }
}

impl PlotConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// (x offset, y offset, width, height) of the drawing area
    pub fn plot_area(&self) -> (u32, u32, u32, u32) {
        (
            self.margin_left,
            self.margin_top,
            self.width.saturating_sub(self.margin_left + self.margin_right),
            self.height.saturating_sub(self.margin_top + self.margin_bottom),
        )
    }
}

/// Data-to-pixel mapping for the first quadrant `[0, x_max] x [0, y_max]`
#[derive(Debug, Clone, Copy)]
struct Frame {
    x_off: f64,
    y_off: f64,
    width: f64,
    height: f64,
    x_max: f64,
    y_max: f64,
}

impl Frame {
    fn px(&self, x: f64) -> f64 {
        self.x_off + x / self.x_max * self.width
    }

    /// Non-finite values are pinned just outside the window so the clip path hides them
    fn py(&self, y: f64) -> f64 {
        let y = y.clamp(-self.y_max, 2.0 * self.y_max);
        self.y_off + self.height - y / self.y_max * self.height
    }
}

/// Feasible-region plot of one optimal mix
pub struct SvgPlot<'a> {
    config: PlotConfig,
    inputs: &'a MixInputs,
    region: FeasibleRegion,
    optimum: (f64, f64),
}

impl<'a> SvgPlot<'a> {
    /// Requires an optimal solution; nothing is plotted for a failed solve
    pub fn new(config: PlotConfig, inputs: &'a MixInputs, solution: &MixSolution) -> PlotResult<Self> {
        let MixSolution::Optimal { quantities, .. } = *solution else {
            return Err(PlotError::NoOptimum);
        };
        let region = FeasibleRegion::derive(inputs);
        if !region.contains(quantities.0, quantities.1, 1e-6) {
            warn!(a = quantities.0, b = quantities.1, "optimum lies outside the feasible region");
        }
        Ok(Self {
            config,
            inputs,
            region,
            optimum: quantities,
        })
    }

    /// Generate SVG content
    pub fn to_svg(&self) -> String {
        let frame = self.frame();
        debug!(x_max = frame.x_max, y_max = frame.y_max, "rendering feasible region");

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<style>
    .title {{ font: bold 16px sans-serif; }}
    .label {{ font: 12px sans-serif; }}
    .axis {{ font: 10px sans-serif; }}
    .grid {{ stroke: #e0e0e0; stroke-width: 1; }}
    .legend {{ font: 11px sans-serif; }}
</style>
<rect width="100%" height="100%" fill="white"/>
<defs><clipPath id="plot-area"><rect x="{x}" y="{y}" width="{pw}" height="{ph}"/></clipPath></defs>
"#,
            w = self.config.width,
            h = self.config.height,
            x = frame.x_off,
            y = frame.y_off,
            pw = frame.width,
            ph = frame.height,
        ));

        if self.config.show_grid {
            self.write_grid(&mut svg, &frame);
        }

        svg.push_str("<g clip-path=\"url(#plot-area)\">\n");
        self.write_region(&mut svg, &frame);
        for (r, line) in self.region.lines.iter().enumerate() {
            self.write_line(&mut svg, &frame, r, line);
        }
        self.write_optimum(&mut svg, &frame);
        svg.push_str("</g>\n");

        self.write_axes(&mut svg, &frame);
        self.write_labels(&mut svg, &frame);
        self.write_legend(&mut svg, &frame);

        svg.push_str("</svg>\n");
        svg
    }

    /// Write SVG to file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        fs::write(path, self.to_svg())?;
        Ok(())
    }

    /// Axes start at zero; upper limits cover the sampled A range, every finite line
    /// value at or above zero, and the optimum.
    fn frame(&self) -> Frame {
        let (x_off, y_off, w, h) = self.config.plot_area();
        let (opt_x, opt_y) = self.optimum;

        let mut x_max = self.region.xs.last().copied().unwrap_or(0.0).max(opt_x);
        let mut y_max = self
            .region
            .line_values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(opt_y, f64::max);

        if !(x_max > 0.0) {
            x_max = 1.0;
        }
        if !(y_max > 0.0) {
            y_max = 1.0;
        }

        Frame {
            x_off: x_off as f64,
            y_off: y_off as f64,
            width: w as f64,
            height: h as f64,
            x_max: x_max * 1.05,
            y_max: y_max * 1.05,
        }
    }

    fn write_grid(&self, svg: &mut String, frame: &Frame) {
        let steps = 5;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let y = frame.y_off + frame.height * t;
            let x = frame.x_off + frame.width * t;
            svg.push_str(&format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" class="grid"/>
"#,
                frame.x_off,
                y,
                frame.x_off + frame.width,
                y
            ));
            svg.push_str(&format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" class="grid"/>
"#,
                x,
                frame.y_off,
                x,
                frame.y_off + frame.height
            ));
        }
    }

    /// Area between `y = 0` and the upper boundary
    fn write_region(&self, svg: &mut String, frame: &Frame) {
        let (Some(&first), Some(&last)) = (self.region.xs.first(), self.region.xs.last()) else {
            return;
        };

        let mut points = String::new();
        points.push_str(&format!("{:.1},{:.1}", frame.px(first), frame.py(0.0)));
        for (&x, &y) in self.region.xs.iter().zip(&self.region.upper) {
            let y = y.clamp(0.0, frame.y_max);
            points.push_str(&format!(" {:.1},{:.1}", frame.px(x), frame.py(y)));
        }
        points.push_str(&format!(" {:.1},{:.1}", frame.px(last), frame.py(0.0)));

        svg.push_str(&format!(
            r#"<polygon points="{}" fill="{}" fill-opacity="{}" stroke="none"/>
"#,
            points,
            Color::LIGHT_GREEN.to_css(),
            self.config.region_opacity
        ));
    }

    fn write_line(&self, svg: &mut String, frame: &Frame, index: usize, line: &ConstraintLine) {
        let color = LINE_COLORS[index].to_css();

        if line.consumption_b == 0.0 {
            // Boundary is vertical, or absent when neither product uses the resource
            if let Some(x) = line.vertical_at() {
                svg.push_str(&format!(
                    r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{}"/>
"#,
                    frame.px(x),
                    frame.y_off,
                    frame.px(x),
                    frame.y_off + frame.height,
                    color,
                    self.config.line_width
                ));
            }
            return;
        }

        let mut path = String::new();
        for (i, (&x, &y)) in self.region.xs.iter().zip(&self.region.line_values[index]).enumerate() {
            let cmd = if i == 0 { "M" } else { " L" };
            path.push_str(&format!("{} {:.1} {:.1}", cmd, frame.px(x), frame.py(y)));
        }
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>
"#,
            path, color, self.config.line_width
        ));
    }

    fn write_optimum(&self, svg: &mut String, frame: &Frame) {
        let (x, y) = self.optimum;
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{}" fill="{}"/>
"#,
            frame.px(x),
            frame.py(y),
            self.config.point_radius,
            Color::RED.to_css()
        ));
    }

    fn write_axes(&self, svg: &mut String, frame: &Frame) {
        let bottom = frame.y_off + frame.height;
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black" stroke-width="2"/>
"#,
            frame.x_off,
            bottom,
            frame.x_off + frame.width,
            bottom
        ));
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black" stroke-width="2"/>
"#,
            frame.x_off, frame.y_off, frame.x_off, bottom
        ));

        let steps = 5;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="axis" text-anchor="middle">{}</text>
"#,
                frame.x_off + frame.width * t,
                bottom + 20.0,
                tick_label(frame.x_max * t)
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="axis" text-anchor="end">{}</text>
"#,
                frame.x_off - 10.0,
                bottom - frame.height * t + 4.0,
                tick_label(frame.y_max * t)
            ));
        }
    }

    fn write_labels(&self, svg: &mut String, frame: &Frame) {
        if let Some(ref title) = self.config.title {
            svg.push_str(&format!(
                r#"<text x="{}" y="25" class="title" text-anchor="middle">{}</text>
"#,
                self.config.width / 2,
                escape(title)
            ));
        }

        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{}" class="label" text-anchor="middle">{}</text>
"#,
            frame.x_off + frame.width / 2.0,
            self.config.height.saturating_sub(15),
            escape(&self.inputs.products[0].name)
        ));

        let mid = frame.y_off + frame.height / 2.0;
        svg.push_str(&format!(
            r#"<text x="20" y="{:.1}" class="label" text-anchor="middle" transform="rotate(-90,20,{:.1})">{}</text>
"#,
            mid,
            mid,
            escape(&self.inputs.products[1].name)
        ));
    }

    /// Wide enough for the longest entry, but never wider than the plot area
    fn legend_width(&self, frame: &Frame) -> f64 {
        let longest = self
            .region
            .lines
            .iter()
            .map(|line| line.name.chars().count() + " constraint".len())
            .chain(["Feasible region".len(), "Optimal solution".len()])
            .max()
            .unwrap_or(0);
        let width = longest as f64 * LEGEND_CHAR_WIDTH + 55.0;
        width.clamp(LEGEND_MIN_WIDTH, frame.width.max(LEGEND_MIN_WIDTH))
    }

    fn write_legend(&self, svg: &mut String, frame: &Frame) {
        let width = self.legend_width(frame);
        let x = (frame.x_off + frame.width - width - 10.0).max(frame.x_off);
        let y = frame.y_off + 10.0;
        let entries = RESOURCES + 2;
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{}\" fill=\"white\" stroke=\"#ccc\" rx=\"5\"/>\n",
            x,
            y,
            width,
            25 * entries + 10
        ));

        for (r, line) in self.region.lines.iter().enumerate() {
            let ly = y + 20.0 + 25.0 * r as f64;
            svg.push_str(&format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="3"/>
"#,
                x + 10.0,
                ly,
                x + 35.0,
                ly,
                LINE_COLORS[r].to_css()
            ));
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="legend">{} constraint</text>
"#,
                x + 45.0,
                ly + 4.0,
                escape(&line.name)
            ));
        }

        let ly = y + 20.0 + 25.0 * RESOURCES as f64;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="25" height="10" fill="{}" fill-opacity="{}"/>
"#,
            x + 10.0,
            ly - 5.0,
            Color::LIGHT_GREEN.to_css(),
            self.config.region_opacity
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" class="legend">Feasible region</text>
"#,
            x + 45.0,
            ly + 4.0
        ));

        let ly = ly + 25.0;
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="5" fill="{}"/>
"#,
            x + 22.5,
            ly,
            Color::RED.to_css()
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" class="legend">Optimal solution</text>
"#,
            x + 45.0,
            ly + 4.0
        ));
    }
}

/// Render the plot for a solve; fails with [`PlotError::NoOptimum`] unless it succeeded
pub fn render_svg(inputs: &MixInputs, solution: &MixSolution) -> PlotResult<String> {
    Ok(SvgPlot::new(PlotConfig::default(), inputs, solution)?.to_svg())
}

fn tick_label(value: f64) -> String {
    if value >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::solve_production_mix;

    fn default_optimum() -> MixSolution {
        MixSolution::Optimal {
            quantities: (50.0, 0.0),
            profit: 250000.0,
        }
    }

    #[test]
    fn test_linspace() {
        let xs = linspace(0.0, 100.0, SAMPLE_COUNT);
        assert_eq!(xs.len(), 200);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[199], 100.0);
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
        assert!((xs[1] - 100.0 / 199.0).abs() < 1e-12);

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn test_default_lines() {
        let region = FeasibleRegion::derive(&MixInputs::default());

        // flour: y = (100 - 2x) / 4, machine: y = (80 - x) / 2
        assert_eq!(region.line_values[0][0], 25.0);
        assert_eq!(region.line_values[1][0], 40.0);
        assert_eq!(region.line_values[0][199], -25.0);
        assert_eq!(region.line_values[1][199], -10.0);

        for i in 0..SAMPLE_COUNT {
            let expected = region.line_values[0][i].min(region.line_values[1][i]);
            assert_eq!(region.upper[i], expected);
        }
        // Machine time never binds for the default inputs
        assert_eq!(region.upper, region.line_values[0]);
    }

    #[test]
    fn test_upper_boundary_switches_lines() {
        // 3x + y <= 120 binds to the right of x = 38, 2x + 4y <= 100 to the left
        let mut inputs = MixInputs::default();
        inputs.products[0].consumption_per_unit = [3.0, 2.0];
        inputs.products[1].consumption_per_unit = [1.0, 4.0];
        inputs.resources[0].max_available = 120.0;
        inputs.resources[1].max_available = 100.0;

        let region = FeasibleRegion::derive(&inputs);

        assert_eq!(region.upper[0], 25.0);
        assert_eq!(region.upper[199], 120.0 - 3.0 * 120.0);
    }

    #[test]
    fn test_zero_consumption_line_is_vertical() {
        let mut inputs = MixInputs::default();
        inputs.products[1].consumption_per_unit[0] = 0.0;

        let line = ConstraintLine::for_resource(&inputs, 0);
        assert_eq!(line.vertical_at(), Some(50.0));
        assert_eq!(line.max_b(10.0), f64::INFINITY);
        assert_eq!(line.max_b(50.0), f64::INFINITY);
        assert_eq!(line.max_b(50.1), f64::NEG_INFINITY);

        let region = FeasibleRegion::derive(&inputs);
        assert!(region.line_values[0].iter().all(|v| !v.is_nan()));
        assert!(region.upper.iter().all(|v| !v.is_nan()));
        // Left of the vertical boundary only machine time limits B
        assert_eq!(region.upper[0], 40.0);
        assert_eq!(region.upper[199], f64::NEG_INFINITY);
    }

    #[test]
    fn test_unused_resource_never_binds() {
        let line = ConstraintLine {
            name: "spare".to_string(),
            capacity: 10.0,
            consumption_a: 0.0,
            consumption_b: 0.0,
        };
        assert_eq!(line.vertical_at(), None);
        assert_eq!(line.max_b(1e9), f64::INFINITY);
    }

    #[test]
    fn test_contains_optimum() {
        let inputs = MixInputs::default();
        let solution = solve_production_mix(&inputs).unwrap();
        let MixSolution::Optimal { quantities: (a, b), .. } = solution else {
            panic!("expected optimal");
        };

        let region = FeasibleRegion::derive(&inputs);
        assert!(region.contains(a, b, 1e-6));
        assert!(!region.contains(a + 1.0, b, 1e-6));
        assert!(!region.contains(-1.0, 0.0, 1e-6));
    }

    #[test]
    fn test_svg_plot_generation() {
        let inputs = MixInputs::default();
        let svg = render_svg(&inputs, &default_optimum()).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Feasible region"));
        assert!(svg.contains("Tepung constraint"));
        assert!(svg.contains("Waktu Mesin constraint"));
        assert!(svg.contains("Optimal solution"));
        assert!(svg.contains(">Keripik</text>"));
        assert!(svg.contains(">Donat</text>"));
        assert!(svg.contains("<polygon"));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_with_vertical_line() {
        let mut inputs = MixInputs::default();
        inputs.products[1].consumption_per_unit[0] = 0.0;
        let solution = solve_production_mix(&inputs).unwrap();

        let svg = render_svg(&inputs, &solution).unwrap();

        assert_eq!(svg.matches("<path").count(), 1);
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_optimum_marker_position() {
        let inputs = MixInputs::default();
        let config = PlotConfig::default();
        let plot = SvgPlot::new(config.clone(), &inputs, &default_optimum()).unwrap();
        let svg = plot.to_svg();

        // x window is 100 * 1.05, so x = 50 maps to 80 + 50 / 105 * 680
        let (x_off, _, w, _) = config.plot_area();
        let expected_px = x_off as f64 + 50.0 / 105.0 * w as f64;
        assert!(svg.contains(&format!("<circle cx=\"{:.1}\"", expected_px)));
    }

    #[test]
    fn test_zero_capacity_still_renders() {
        let mut inputs = MixInputs::default();
        inputs.resources[0].max_available = 0.0;
        inputs.resources[1].max_available = 0.0;
        let solution = solve_production_mix(&inputs).unwrap();

        let svg = render_svg(&inputs, &solution).unwrap();

        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_failed_solve_has_no_plot() {
        let inputs = MixInputs::default();
        assert!(matches!(
            render_svg(&inputs, &MixSolution::Infeasible),
            Err(PlotError::NoOptimum)
        ));
        assert!(matches!(
            render_svg(&inputs, &MixSolution::SolverFailure),
            Err(PlotError::NoOptimum)
        ));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut inputs = MixInputs::default();
        inputs.resources[0].name = "Flour <kg> & co".to_string();

        let svg = render_svg(&inputs, &default_optimum()).unwrap();

        assert!(svg.contains("Flour &lt;kg&gt; &amp; co constraint"));
    }

    /// `(x, width)` of the legend box
    fn legend_box(svg: &str) -> (f64, f64) {
        let rect = svg.lines().find(|l| l.contains("stroke=\"#ccc\"")).unwrap();
        let attr = |name: &str| -> f64 {
            let start = rect.find(&format!(" {}=\"", name)).unwrap() + name.len() + 3;
            let end = start + rect[start..].find('"').unwrap();
            rect[start..end].parse().unwrap()
        };
        (attr("x"), attr("width"))
    }

    #[test]
    fn test_legend_fits_long_names() {
        let (_, default_width) = legend_box(&render_svg(&MixInputs::default(), &default_optimum()).unwrap());
        assert!(default_width >= LEGEND_MIN_WIDTH);

        let mut inputs = MixInputs::default();
        inputs.resources[1].name = "Machine time on the shared fryer line".to_string();
        let svg = render_svg(&inputs, &default_optimum()).unwrap();

        let (x, width) = legend_box(&svg);
        let label = "Machine time on the shared fryer line constraint".len() as f64;
        assert!(width >= label * LEGEND_CHAR_WIDTH);
        assert!(width > default_width);

        // Box stays inside the plot area
        let (x_off, _, w, _) = PlotConfig::default().plot_area();
        assert!(x >= x_off as f64);
        assert!(x + width <= (x_off + w) as f64);
    }
}
