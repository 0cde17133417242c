use datajoin::{BandScale, LinearScale};

fn main() {
    // Example: the scales behind a bar chart with a 492x300 drawing area.
    let data = [12.0, 36.0, 28.0, 52.0, 14.0, 48.0];

    let x = BandScale::new(data.len(), (0.0, 492.0)).with_padding(0.15);
    let max = data.iter().copied().fold(0.0f64, f64::max);
    let mut y = LinearScale::new((0.0, max), (300.0, 0.0));
    y.nice(10);

    println!("y domain={:?} ticks={:?}", y.domain(), y.ticks(10));
    for (i, v) in data.iter().enumerate() {
        let top = y.apply(*v);
        println!(
            "bar #{} x={:?} width={} y={top} height={}",
            i + 1,
            x.position(i),
            x.bandwidth(),
            300.0 - top
        );
    }
}
