//! Plot out a simulated pad reading alongside its tracked baseline and trip threshold
//!
//! Look in /images/ for the resulting plot.
//!
//! Requires plotters lib: https://docs.rs/plotters/latest/plotters/. Tested on an Ubuntu machine.

use plotters::prelude::*;
use touch_piano::{
    baseline::BaselineTracker,
    sensor::{SensorId, NUM_SENSORS},
    touch::{trip_threshold, TouchClassifier},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const NUM_CYCLES: usize = 2_000;
    const UNTOUCHED: f32 = 200.0;

    let mut classifier = TouchClassifier::new(BaselineTracker::with_baselines([UNTOUCHED as u16; NUM_SENSORS]));

    // slow environmental drift plus a little noise, the noise is a cheap deterministic LCG so the plot is repeatable
    let mut seed: u32 = 1;
    let mut mock_counts: [f32; NUM_CYCLES] = [UNTOUCHED; NUM_CYCLES];
    mock_counts.iter_mut().enumerate().for_each(|(i, x)| {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let noise = ((seed >> 16) % 7) as f32 - 3.0;
        *x = UNTOUCHED + f32::sin(6.283 * (i as f32 / NUM_CYCLES as f32)) * 12.0 + noise;
    });

    // a firm touch, then a light one that only just trips
    mock_counts[400..700].iter_mut().for_each(|x| *x -= 60.0);
    mock_counts[1200..1400].iter_mut().for_each(|x| *x -= 30.0);

    let mut baselines = [0.0_f32; NUM_CYCLES];
    let mut thresholds = [0.0_f32; NUM_CYCLES];
    let mut tripped = [false; NUM_CYCLES];

    for (i, count) in mock_counts.iter().enumerate() {
        let ts = classifier.poll([*count as u16; NUM_SENSORS]);
        let baseline = classifier.baselines().baseline(SensorId::S0);
        baselines[i] = baseline as f32;
        thresholds[i] = trip_threshold(baseline) as f32;
        tripped[i] = ts.is_tripped(SensorId::S0);
    }

    let root =
        BitMapBackend::new("images/baseline_example_plot_0.png", (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Baseline Tracking", ("Arial", 20).into_font())
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..NUM_CYCLES, 100f32..230f32)?;

    chart
        .configure_mesh()
        .x_desc("Poll cycle")
        .y_desc("Oscillator count")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            mock_counts.iter().enumerate().map(|(i, x)| (i, *x)),
            BLUE,
        ))?
        .label("Raw count")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            baselines.iter().enumerate().map(|(i, x)| (i, *x)),
            GREEN,
        ))?
        .label("Baseline")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .draw_series(LineSeries::new(
            thresholds.iter().enumerate().map(|(i, x)| (i, *x)),
            RED,
        ))?
        .label("Trip threshold")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    // mark every tripped cycle along the bottom of the plot
    chart.draw_series(
        tripped
            .iter()
            .enumerate()
            .filter(|(_, t)| **t)
            .map(|(i, _)| Circle::new((i, 105.0), 1, BLACK.filled())),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}
