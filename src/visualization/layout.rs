//! Screen geometry for the Atwood machine drawing
//!
//! Everything here works in canvas space: x to the right, y down, origin at
//! the top-left corner of the window, one unit per pixel. `Layout::to_world`
//! converts to Bevy's centred, y-up world space at draw time. Keeping the
//! geometry free of any Bevy system makes it easy to test.

use std::f32::consts::{PI, TAU};

use bevy::math::Vec2;

use crate::simulation::history::{RollingBuffer, Sample};

pub const CEILING_Y: f32 = 50.0;
pub const PULLEY_Y: f32 = 100.0;
pub const PULLEY_RADIUS: f32 = 35.0;
pub const ROPE_LENGTH: f32 = 220.0;
pub const MASS_SIZE: f32 = 50.0;
pub const SPOKES: usize = 6;
pub const CHART_PANEL_WIDTH: f32 = 320.0;

/// px per newton for the force diagram
pub const FORCE_SCALE: f32 = 1.5;

/// Minimum |velocity| for the pulley direction indicator
pub const DIRECTION_THRESHOLD: f64 = 0.05;

/// Where the machine sits on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub canvas_width: f32, // whole window, charts included
    pub canvas_height: f32,
    pub machine_width: f32, // left part of the window holding the machine
    pub center_x: f32, // pulley centre
    pub pixels_per_meter: f32,
}

impl Layout {
    pub fn new(machine_width: f32, height: f32, pixels_per_meter: f64, with_charts: bool) -> Self {
        let chart_width = if with_charts { CHART_PANEL_WIDTH } else { 0.0 };
        Self {
            canvas_width: machine_width + chart_width,
            canvas_height: height,
            machine_width,
            center_x: machine_width / 2.0,
            pixels_per_meter: pixels_per_meter as f32,
        }
    }

    /// Canvas (y down, top-left origin) to Bevy world (y up, centred)
    pub fn to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.canvas_width / 2.0, self.canvas_height / 2.0 - p.y)
    }

    pub fn pulley_center(&self) -> Vec2 {
        Vec2::new(self.center_x, PULLEY_Y)
    }

    /// Left and right tangent points, where the ropes leave the pulley
    pub fn tangent_points(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.center_x - PULLEY_RADIUS, PULLEY_Y),
            Vec2::new(self.center_x + PULLEY_RADIUS, PULLEY_Y),
        )
    }

    pub fn rest_y(&self) -> f32 {
        PULLEY_Y + ROPE_LENGTH
    }

    /// Centres of mass1 and mass2 for a given mass2 travel in metres.
    /// Positive position lowers mass2 and raises mass1.
    pub fn mass_centers(&self, position: f64) -> (Vec2, Vec2) {
        let offset = position as f32 * self.pixels_per_meter;
        let (left, right) = self.tangent_points();
        (
            Vec2::new(left.x, self.rest_y() - offset),
            Vec2::new(right.x, self.rest_y() + offset),
        )
    }

    /// Arc length over radius, positive = clockwise on screen
    pub fn pulley_angle(&self, position: f64) -> f32 {
        position as f32 * self.pixels_per_meter / PULLEY_RADIUS
    }

    /// Outer ends of the pulley spokes for a rotation `angle`
    pub fn spoke_ends(&self, angle: f32) -> [Vec2; SPOKES] {
        let center = self.pulley_center();
        let length = PULLEY_RADIUS - 8.0;
        std::array::from_fn(|i| {
            let a = angle + i as f32 * TAU / SPOKES as f32;
            center + length * Vec2::new(a.cos(), a.sin())
        })
    }

    /// Vertical rope pieces from each tangent point down to 25 px above the
    /// mass centre
    pub fn rope_segments(&self, position: f64) -> [(Vec2, Vec2); 2] {
        let (left, right) = self.tangent_points();
        let (m1, m2) = self.mass_centers(position);
        [
            (left, Vec2::new(m1.x, m1.y - MASS_SIZE / 2.0)),
            (right, Vec2::new(m2.x, m2.y - MASS_SIZE / 2.0)),
        ]
    }

    /// Rope lying over the top half of the pulley
    pub fn rope_arc(&self) -> Vec<Vec2> {
        // y is down, so the top half runs from angle PI to 2 PI
        arc_points(self.pulley_center(), PULLEY_RADIUS, PI, TAU, 24)
    }

    /// Closed outline of a mass box centred at `center`
    pub fn mass_outline(&self, center: Vec2) -> [Vec2; 5] {
        let h = MASS_SIZE / 2.0;
        [
            center + Vec2::new(-h, -h),
            center + Vec2::new(h, -h),
            center + Vec2::new(h, h),
            center + Vec2::new(-h, h),
            center + Vec2::new(-h, -h),
        ]
    }

    /// Anchor of the sign convention legend
    pub fn legend_origin(&self) -> Vec2 {
        Vec2::new(10.0, self.canvas_height - 30.0)
    }

    /// The two chart panels stacked on the right of the machine:
    /// velocity on top, acceleration below
    pub fn chart_frames(&self, window: f64) -> Option<[ChartFrame; 2]> {
        if self.canvas_width <= self.machine_width {
            return None;
        }
        let left = self.machine_width + 20.0;
        let width = self.canvas_width - left - 20.0;
        let height = ((self.canvas_height - 3.0 * 50.0) / 2.0).max(0.0);
        Some([
            ChartFrame {
                origin: Vec2::new(left, 50.0),
                size: Vec2::new(width, height),
                window,
            },
            ChartFrame {
                origin: Vec2::new(left, 100.0 + height),
                size: Vec2::new(width, height),
                window,
            },
        ])
    }
}

/// Points along a circular arc from `start` to `end` (radians, canvas space)
pub fn arc_points(center: Vec2, radius: f32, start: f32, end: f32, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let a = start + (end - start) * i as f32 / segments as f32;
            center + radius * Vec2::new(a.cos(), a.sin())
        })
        .collect()
}

/// Split a line into dash segments of `dash` px separated by `gap` px
pub fn dashed(start: Vec2, end: Vec2, dash: f32, gap: f32) -> Vec<(Vec2, Vec2)> {
    let length = start.distance(end);
    if length <= f32::EPSILON || dash <= 0.0 {
        return Vec::new();
    }
    let dir = (end - start) / length;
    let mut out = Vec::new();
    let mut at = 0.0;
    while at < length {
        let stop = (at + dash).min(length);
        out.push((start + dir * at, start + dir * stop));
        at = stop + gap.max(0.0);
    }
    out
}

/// Sizing of a vertical double arrow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowStyle {
    pub threshold: f64, // hidden below this magnitude
    pub scale: f32, // px per unit
    pub half_gap: f32, // distance of each shaft from the centre line
    pub head_size: f32,
    pub dashed: bool,
}

pub const VELOCITY_ARROW: ArrowStyle = ArrowStyle {
    threshold: 0.05,
    scale: 20.0,
    half_gap: 6.0,
    head_size: 12.0,
    dashed: false,
};

pub const ACCELERATION_ARROW: ArrowStyle = ArrowStyle {
    threshold: 0.01,
    scale: 20.0,
    half_gap: 5.0,
    head_size: 10.0,
    dashed: true,
};

/// Two parallel vertical shafts with a triangular head each
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleArrow {
    pub shafts: [(Vec2, Vec2); 2],
    pub heads: [[Vec2; 3]; 2],
    pub dashed: bool,
}

/// Double arrow starting at `(x, y)`. Positive `value` points down the
/// screen. `None` when the value is too small to draw.
pub fn double_arrow(x: f32, y: f32, value: f64, style: &ArrowStyle) -> Option<DoubleArrow> {
    if value.abs() < style.threshold {
        return None;
    }
    let length = value as f32 * style.scale;
    let end_y = y + length;
    let direction = if length > 0.0 { 1.0 } else { -1.0 };
    let half_head = style.head_size / 2.0;

    let shaft = |dx: f32| (Vec2::new(x + dx, y), Vec2::new(x + dx, end_y));
    let head = |dx: f32| {
        [
            Vec2::new(x + dx, end_y),
            Vec2::new(x + dx - half_head, end_y - direction * style.head_size),
            Vec2::new(x + dx + half_head, end_y - direction * style.head_size),
        ]
    };

    Some(DoubleArrow {
        shafts: [shaft(-style.half_gap), shaft(style.half_gap)],
        heads: [head(-style.half_gap), head(style.half_gap)],
        dashed: style.dashed,
    })
}

/// Single vertical force arrow of `magnitude` newtons from `from`,
/// pointing up when `up` is set. Returns the shaft and the head triangle.
pub fn force_arrow(from: Vec2, magnitude: f64, up: bool) -> ((Vec2, Vec2), [Vec2; 3]) {
    let sign = if up { -1.0 } else { 1.0 };
    let tip = from + Vec2::new(0.0, sign * magnitude as f32 * FORCE_SCALE);
    let head = [
        tip,
        tip + Vec2::new(-5.0, -sign * 8.0),
        tip + Vec2::new(5.0, -sign * 8.0),
    ];
    ((from, tip), head)
}

/// Curved arrow on the pulley showing which way it turns.
/// `None` while the machine is (nearly) at rest.
pub fn rotation_indicator(center: Vec2, velocity: f64) -> Option<(Vec<Vec2>, [Vec2; 3])> {
    if velocity.abs() <= DIRECTION_THRESHOLD {
        return None;
    }
    let radius = PULLEY_RADIUS * 0.6;
    let sweep = PI * 0.4;
    let clockwise = velocity > 0.0;

    // right side for clockwise, left side otherwise, always drawn towards the bottom
    let (start, end) = if clockwise { (-sweep, sweep) } else { (PI + sweep, PI - sweep) };
    let arc = arc_points(center, radius, start, end, 16);

    Some((arc, arc_head(center, radius, end, clockwise, 8.0)))
}

/// Small clockwise dial for the sign convention legend, centred on `center`
pub fn legend_dial(center: Vec2) -> (Vec<Vec2>, [Vec2; 3]) {
    let radius = 8.0;
    let sweep = PI * 0.3;
    let arc = arc_points(center, radius, -sweep, sweep, 10);
    (arc, arc_head(center, radius, sweep, true, 5.0))
}

// arrowhead at angle `end` on a circle, pointing along the direction of travel
fn arc_head(center: Vec2, radius: f32, end: f32, clockwise: bool, size: f32) -> [Vec2; 3] {
    let tip = center + radius * Vec2::new(end.cos(), end.sin());
    let heading = end + if clockwise { PI / 2.0 } else { -PI / 2.0 };
    let back = heading + PI;
    [
        tip,
        tip + size * Vec2::new((back + 0.3).cos(), (back + 0.3).sin()),
        tip + size * Vec2::new((back - 0.3).cos(), (back - 0.3).sin()),
    ]
}

/// One chart panel in canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub origin: Vec2, // top-left corner
    pub size: Vec2,
    pub window: f64, // visible seconds
}

impl ChartFrame {
    /// Visible time range, following the newest sample once it passes the window
    pub fn time_span(&self, latest: f64) -> (f64, f64) {
        let start = (latest - self.window).max(0.0);
        (start, start + self.window)
    }

    /// Symmetric value range around zero covering every visible sample
    pub fn value_extent(&self, history: &RollingBuffer, value: impl Fn(&Sample) -> f64) -> f64 {
        let (start, _) = self.time_span(history.latest().map_or(0.0, |s| s.time));
        history
            .iter()
            .filter(|s| s.time >= start)
            .map(|s| value(s).abs())
            .fold(1.0, f64::max)
    }

    /// Polyline of the visible samples, oldest first
    pub fn plot(&self, history: &RollingBuffer, value: impl Fn(&Sample) -> f64) -> Vec<Vec2> {
        let Some(latest) = history.latest() else {
            return Vec::new();
        };
        let (start, _) = self.time_span(latest.time);
        let extent = self.value_extent(history, &value);
        let mid_y = self.origin.y + self.size.y / 2.0;

        history
            .iter()
            .filter(|s| s.time >= start)
            .map(|s| {
                let x = self.origin.x + ((s.time - start) / self.window) as f32 * self.size.x;
                let y = mid_y - (value(s) / extent) as f32 * (self.size.y / 2.0);
                Vec2::new(x, y)
            })
            .collect()
    }

    /// Zero line across the panel
    pub fn axis(&self) -> (Vec2, Vec2) {
        let mid_y = self.origin.y + self.size.y / 2.0;
        (
            Vec2::new(self.origin.x, mid_y),
            Vec2::new(self.origin.x + self.size.x, mid_y),
        )
    }

    pub fn outline(&self) -> [Vec2; 5] {
        let o = self.origin;
        let s = self.size;
        [
            o,
            o + Vec2::new(s.x, 0.0),
            o + s,
            o + Vec2::new(0.0, s.y),
            o,
        ]
    }
}
