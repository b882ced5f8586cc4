use argraph::prelude::*;

fn main() -> Result<()> {
    // a loose helix with a linear drift along x
    let points: Vec<[f32; 3]> = (0..120)
        .map(|i| {
            let t = i as f32 * 0.15;
            [t * 0.8, 3.0 * t.sin() + 4.0, 3.0 * t.cos()]
        })
        .collect();

    let titles = AxisTitles {
        x: "time".into(),
        y: "height".into(),
        z: "depth".into(),
    };
    run_plot(PlotSpec::Scatter { points }, titles, PlotConfig::default())
}
