use argraph::prelude::*;

fn main() -> Result<()> {
    let config = PlotConfig::from_json_str(r#"{ "style": { "colormap": "plasma" } }"#)?;

    let ripple = std::env::args().any(|a| a == "--function");
    let spec = if ripple {
        PlotSpec::Function {
            expression: "sin(3 * x) * cos(3 * y)".into(),
            range: FunctionRange {
                points_x: 60,
                points_y: 60,
                ..FunctionRange::default()
            },
        }
    } else {
        let heights = (0..40)
            .map(|r| {
                (0..40)
                    .map(|c| {
                        let (x, y) = (c as f32 / 8.0 - 2.5, r as f32 / 8.0 - 2.5);
                        (-(x * x + y * y)).exp() * 6.0
                    })
                    .collect()
            })
            .collect();
        PlotSpec::Surface { heights }
    };

    run_plot(spec, AxisTitles::default(), config)
}
