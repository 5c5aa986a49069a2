//! Builds a small two-pane layout headlessly and prints the draw commands.
//!
//! Run with `RUST_LOG=debug` to see the session's pass tracing.

use lamina::{Config, FaultPolicy, LayoutError, Session};
use lamina_engine::{
    Color, Dimensions, ElementConfig, LayoutConfig, LayoutDirection, Padding, RectangleConfig,
    Sizing, SoftwareEngine, TextConfig,
};

fn main() -> Result<(), LayoutError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut session = Session::new(SoftwareEngine::new(), Dimensions::new(800.0, 600.0))
        .with_fault_policy(FaultPolicy::Log);
    session.set_measure_text(|text, config| {
        Dimensions::new(text.len() as f32 * 8.0, config.font_size as f32)
    });

    session.begin_layout()?;
    session.element(
        Some("root".into()),
        [
            Config::from(LayoutConfig {
                sizing: Sizing::grow(),
                direction: LayoutDirection::LeftToRight,
                padding: Padding::all(16),
                child_gap: 16,
                ..Default::default()
            }),
            Config::from(ElementConfig::Rectangle(RectangleConfig {
                color: Color::rgb(0.12, 0.12, 0.14),
                ..Default::default()
            })),
        ],
        |s| {
            s.element(
                Some("sidebar".into()),
                [
                    Config::from(LayoutConfig {
                        sizing: Sizing {
                            width: lamina_engine::SizingAxis::Fixed(200.0),
                            height: lamina_engine::SizingAxis::GROW,
                        },
                        ..Default::default()
                    }),
                    Config::from(ElementConfig::Rectangle(RectangleConfig {
                        color: Color::rgb(0.2, 0.2, 0.25),
                        ..Default::default()
                    })),
                ],
                |_| Ok(()),
            )?;
            s.element(
                Some("content".into()),
                [Config::from(LayoutConfig {
                    sizing: Sizing::grow(),
                    padding: Padding::all(8),
                    ..Default::default()
                })],
                |s| {
                    s.text("hello, lamina", TextConfig::default())?;
                    Ok(())
                },
            )
        },
    )?;
    let commands = session.end_layout()?;

    for command in &commands {
        println!(
            "{:?} id={:#010x} at {:?}",
            command.kind(),
            command.id,
            command.bounding_box
        );
    }
    Ok(())
}
