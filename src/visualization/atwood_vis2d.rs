use bevy::prelude::*;
use bevy::sprite::{Anchor, MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;
use bevy::window::WindowResolution;

use crate::configuration::config::DisplayConfig;
use crate::simulation::forces::force_diagram;
use crate::simulation::history::Sample;
use crate::simulation::scenario::Scenario;
use crate::visualization::controls::command_for_key;
use crate::visualization::layout::{
    dashed, double_arrow, force_arrow, legend_dial, rotation_indicator, DoubleArrow, Layout,
    ACCELERATION_ARROW, CEILING_Y, MASS_SIZE, PULLEY_RADIUS, PULLEY_Y, VELOCITY_ARROW,
};
use crate::visualization::readout::{mass_caption, panel_text};

const INK: Color = Color::srgb(0.286, 0.314, 0.341);
const ROPE: Color = Color::srgb(0.424, 0.459, 0.490);
const PULLEY_FILL: Color = Color::srgb(0.678, 0.710, 0.741);
const MASS1_FILL: Color = Color::srgb(0.184, 0.643, 0.906);
const MASS2_FILL: Color = Color::srgb(0.906, 0.298, 0.235);
const BOX_EDGE: Color = Color::srgb(0.173, 0.243, 0.314);
const VELOCITY: Color = Color::srgb(0.157, 0.655, 0.271);
const ACCELERATION: Color = Color::srgb(1.0, 0.757, 0.027);
const FORCE: Color = Color::srgb(0.435, 0.259, 0.757);
const BACKGROUND: Color = Color::srgb(0.973, 0.976, 0.980);

const LEGEND_SIZE: Vec2 = Vec2::new(280.0, 30.0);

/// Canvas geometry plus the chart time window, shared by all draw systems
#[derive(Resource, Debug, Clone)]
pub struct View {
    pub layout: Layout,
    pub chart_window: f64,
}

impl View {
    pub fn from_config(display: &DisplayConfig, pixels_per_meter: f64) -> Self {
        Self {
            layout: Layout::new(display.width, display.height, pixels_per_meter, display.graphs),
            chart_window: display.chart_window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

#[derive(Component)]
struct MassBox(Side);

#[derive(Component)]
struct MassCaption(Side);

#[derive(Component)]
struct ReadoutText;

#[derive(Component)]
struct ChartTitle;

pub fn run_2d(scenario: Scenario, view: View) {
    let resolution = WindowResolution::new(view.layout.canvas_width, view.layout.canvas_height);

    App::new()
        .insert_resource(scenario)
        .insert_resource(view)
        .insert_resource(ClearColor(BACKGROUND))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Atwood machine".to_string(),
                resolution,
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, setup_scene_system)
        .add_systems(
            Update,
            (
                keyboard_system,
                physics_step_system,
                sync_masses_system,
                draw_machine_system,
                draw_vectors_system,
                draw_charts_system,
                update_readout_system,
            )
                .chain(),
        )
        .run();
}

fn setup_scene_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    view: Res<View>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());

    let layout = &view.layout;
    let state = &scenario.state;

    // Pulley wheel, spokes and rim are gizmos drawn over it every frame
    commands.spawn(MaterialMesh2dBundle {
        mesh: Mesh2dHandle(meshes.add(Circle::new(PULLEY_RADIUS))),
        material: materials.add(ColorMaterial::from(PULLEY_FILL)),
        transform: Transform::from_translation(layout.to_world(layout.pulley_center()).extend(0.0)),
        ..Default::default()
    });

    let (m1, m2) = layout.mass_centers(state.position);
    let masses = [
        (Side::Left, m1, MASS1_FILL, "m1", state.mass1()),
        (Side::Right, m2, MASS2_FILL, "m2", state.mass2()),
    ];
    for (side, center, color, name, mass) in masses {
        commands
            .spawn((
                SpriteBundle {
                    sprite: Sprite {
                        color,
                        custom_size: Some(Vec2::splat(MASS_SIZE)),
                        ..default()
                    },
                    transform: Transform::from_translation(layout.to_world(center).extend(1.0)),
                    ..default()
                },
                MassBox(side),
            ))
            .with_children(|parent| {
                parent.spawn(Text2dBundle {
                    text: Text::from_section(name, caption_style(16.0)),
                    transform: Transform::from_xyz(0.0, 8.0, 1.0),
                    ..default()
                });
                parent.spawn((
                    Text2dBundle {
                        text: Text::from_section(mass_caption(mass), caption_style(12.0)),
                        transform: Transform::from_xyz(0.0, -8.0, 1.0),
                        ..default()
                    },
                    MassCaption(side),
                ));
            });
    }

    // Sign convention legend on a white card, its frame and arrow are gizmos
    let legend = layout.legend_origin();
    commands.spawn(SpriteBundle {
        sprite: Sprite {
            color: Color::WHITE,
            custom_size: Some(LEGEND_SIZE),
            ..default()
        },
        transform: Transform::from_translation(
            layout.to_world(legend + Vec2::new(LEGEND_SIZE.x / 2.0, 0.0)).extend(1.5),
        ),
        ..default()
    });
    commands.spawn(Text2dBundle {
        text: Text::from_section("Sign convention: clockwise = positive (+)", ink_style(12.0)),
        text_anchor: Anchor::CenterLeft,
        transform: Transform::from_translation(layout.to_world(legend + Vec2::new(8.0, 0.0)).extend(2.0)),
        ..default()
    });

    if let Some(frames) = layout.chart_frames(view.chart_window) {
        let visibility = if scenario.overlays.show_graphs {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        for (frame, title) in frames.iter().zip(["velocity (m/s)", "acceleration (m/s^2)"]) {
            commands.spawn((
                Text2dBundle {
                    text: Text::from_section(title, ink_style(14.0)),
                    text_anchor: Anchor::BottomLeft,
                    transform: Transform::from_translation(
                        layout.to_world(frame.origin - Vec2::new(0.0, 6.0)).extend(2.0),
                    ),
                    visibility,
                    ..default()
                },
                ChartTitle,
            ));
        }
    }

    commands.spawn((
        TextBundle::from_section(panel_text(&scenario), ink_style(15.0)).with_style(Style {
            position_type: PositionType::Absolute,
            bottom: Val::Px(50.0),
            left: Val::Px(10.0),
            ..default()
        }),
        ReadoutText,
    ));

    info!(
        "Atwood viewer ready: m1 = {:.1} kg, m2 = {:.1} kg, a = {:.2} m/s², T = {:.2} N",
        state.mass1(),
        state.mass2(),
        state.acceleration(),
        state.tension()
    );
}

fn caption_style(font_size: f32) -> TextStyle {
    TextStyle {
        font_size,
        color: Color::WHITE,
        ..default()
    }
}

fn ink_style(font_size: f32) -> TextStyle {
    TextStyle {
        font_size,
        color: INK,
        ..default()
    }
}

/// Key presses become commands, applied before this frame's physics step
fn keyboard_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut scenario: ResMut<Scenario>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
        return;
    }
    for key in keys.get_just_pressed() {
        if let Some(command) = command_for_key(*key, &scenario) {
            debug!("{key:?} -> {command:?}");
            scenario.apply(command);
        }
    }
}

/// One displayed frame worth of physics
pub fn physics_step_system(mut scenario: ResMut<Scenario>, time: Res<Time>) {
    scenario.advance_frame(time.delta_seconds_f64());
}

fn sync_masses_system(
    scenario: Res<Scenario>,
    view: Res<View>,
    mut boxes: Query<(&MassBox, &mut Transform)>,
    mut captions: Query<(&MassCaption, &mut Text)>,
) {
    let (m1, m2) = view.layout.mass_centers(scenario.state.position);
    for (MassBox(side), mut transform) in &mut boxes {
        let center = match side {
            Side::Left => m1,
            Side::Right => m2,
        };
        let world = view.layout.to_world(center);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }

    for (MassCaption(side), mut text) in &mut captions {
        let mass = match side {
            Side::Left => scenario.state.mass1(),
            Side::Right => scenario.state.mass2(),
        };
        let caption = mass_caption(mass);
        if text.sections[0].value != caption {
            text.sections[0].value = caption;
        }
    }
}

/// Ceiling, pulley spokes, ropes and box outlines
fn draw_machine_system(mut gizmos: Gizmos, scenario: Res<Scenario>, view: Res<View>) {
    let layout = &view.layout;
    let w = |p: Vec2| layout.to_world(p);
    let state = &scenario.state;

    // Ceiling and pulley support
    gizmos.line_2d(w(Vec2::new(0.0, CEILING_Y)), w(Vec2::new(layout.machine_width, CEILING_Y)), INK);
    gizmos.line_2d(
        w(Vec2::new(layout.center_x, CEILING_Y)),
        w(Vec2::new(layout.center_x, PULLEY_Y - PULLEY_RADIUS)),
        INK,
    );

    // Pulley rim and rotating spokes
    let center = layout.pulley_center();
    gizmos.circle_2d(w(center), PULLEY_RADIUS, INK);
    for end in layout.spoke_ends(layout.pulley_angle(state.position)) {
        gizmos.line_2d(w(center), w(end), ROPE);
        gizmos.circle_2d(w(end), 3.0, INK);
    }
    gizmos.circle_2d(w(center), 8.0, INK);

    if let Some((arc, head)) = rotation_indicator(center, state.velocity) {
        let color = if state.velocity > 0.0 { VELOCITY } else { MASS2_FILL };
        gizmos.linestrip_2d(arc.into_iter().map(w), color);
        triangle(&mut gizmos, head.map(w), color);
    }

    // Ropes down to the boxes and over the wheel
    for (top, bottom) in layout.rope_segments(state.position) {
        gizmos.line_2d(w(top), w(bottom), ROPE);
    }
    gizmos.linestrip_2d(layout.rope_arc().into_iter().map(w), ROPE);

    let (m1, m2) = layout.mass_centers(state.position);
    for c in [m1, m2] {
        gizmos.linestrip_2d(layout.mass_outline(c).map(w), BOX_EDGE);
    }

    // Legend frame with a small clockwise arrow
    let legend = layout.legend_origin();
    let corner = legend - Vec2::new(0.0, LEGEND_SIZE.y / 2.0);
    gizmos.linestrip_2d(
        [
            corner,
            corner + Vec2::new(LEGEND_SIZE.x, 0.0),
            corner + LEGEND_SIZE,
            corner + Vec2::new(0.0, LEGEND_SIZE.y),
            corner,
        ]
        .map(w),
        INK,
    );
    let (dial, head) = legend_dial(legend + Vec2::new(265.0, 0.0));
    gizmos.linestrip_2d(dial.into_iter().map(w), VELOCITY);
    triangle(&mut gizmos, head.map(w), VELOCITY);
}

/// Velocity and acceleration double arrows, plus force diagrams when enabled
fn draw_vectors_system(mut gizmos: Gizmos, scenario: Res<Scenario>, view: Res<View>) {
    let layout = &view.layout;
    let state = &scenario.state;
    let (m1, m2) = layout.mass_centers(state.position);
    let v = state.velocity;
    let a = state.acceleration();

    // mass1 moves opposite to mass2, so its vectors are negated
    let arrows = [
        (double_arrow(m1.x - 50.0, m1.y, -v, &VELOCITY_ARROW), VELOCITY),
        (double_arrow(m1.x - 90.0, m1.y, -a, &ACCELERATION_ARROW), ACCELERATION),
        (double_arrow(m2.x + 50.0, m2.y, v, &VELOCITY_ARROW), VELOCITY),
        (double_arrow(m2.x + 90.0, m2.y, a, &ACCELERATION_ARROW), ACCELERATION),
    ];
    for (arrow, color) in arrows {
        if let Some(arrow) = arrow {
            draw_double_arrow(&mut gizmos, layout, &arrow, color);
        }
    }

    if scenario.overlays.show_forces {
        let forces = force_diagram(state);
        let half = Vec2::new(0.0, MASS_SIZE / 2.0);
        let pieces = [
            force_arrow(m1 - half, forces.tension, true),
            force_arrow(m1 + half, forces.weight1, false),
            force_arrow(m2 - half, forces.tension, true),
            force_arrow(m2 + half, forces.weight2, false),
        ];
        for ((from, to), head) in pieces {
            gizmos.line_2d(layout.to_world(from), layout.to_world(to), FORCE);
            triangle(&mut gizmos, head.map(|p| layout.to_world(p)), FORCE);
        }
    }
}

fn draw_double_arrow(gizmos: &mut Gizmos, layout: &Layout, arrow: &DoubleArrow, color: Color) {
    for (start, end) in arrow.shafts {
        if arrow.dashed {
            for (a, b) in dashed(start, end, 7.0, 5.0) {
                gizmos.line_2d(layout.to_world(a), layout.to_world(b), color);
            }
        } else {
            gizmos.line_2d(layout.to_world(start), layout.to_world(end), color);
        }
    }
    for head in arrow.heads {
        triangle(gizmos, head.map(|p| layout.to_world(p)), color);
    }
}

fn triangle(gizmos: &mut Gizmos, points: [Vec2; 3], color: Color) {
    gizmos.linestrip_2d([points[0], points[1], points[2], points[0]], color);
}

/// Rolling velocity and acceleration charts
fn draw_charts_system(
    mut gizmos: Gizmos,
    scenario: Res<Scenario>,
    view: Res<View>,
    mut titles: Query<&mut Visibility, With<ChartTitle>>,
) {
    let shown = scenario.overlays.show_graphs;
    let wanted = if shown { Visibility::Inherited } else { Visibility::Hidden };
    for mut visibility in &mut titles {
        if *visibility != wanted {
            *visibility = wanted;
        }
    }

    let (Some(history), Some(frames)) = (scenario.history.as_ref(), view.layout.chart_frames(view.chart_window)) else {
        return;
    };
    if !shown {
        return;
    }

    let layout = &view.layout;
    let series: [(fn(&Sample) -> f64, Color); 2] = [
        (|s: &Sample| s.velocity, VELOCITY),
        (|s: &Sample| s.acceleration, ACCELERATION),
    ];
    for (frame, (value, color)) in frames.iter().zip(series) {
        gizmos.linestrip_2d(frame.outline().map(|p| layout.to_world(p)), INK);
        let (left, right) = frame.axis();
        gizmos.line_2d(layout.to_world(left), layout.to_world(right), ROPE);

        let points = frame.plot(history, value);
        if points.len() >= 2 {
            gizmos.linestrip_2d(points.into_iter().map(|p| layout.to_world(p)), color);
        }
    }
}

fn update_readout_system(scenario: Res<Scenario>, mut query: Query<&mut Text, With<ReadoutText>>) {
    let panel = panel_text(&scenario);
    for mut text in &mut query {
        if text.sections[0].value != panel {
            text.sections[0].value = panel.clone();
        }
    }
}
