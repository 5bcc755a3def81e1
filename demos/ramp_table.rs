//! Prints the intensity ramp as a table, highlighting where the 8-bit
//! wraparound kicks in above 255.

use xyzi2rgb_color::{ChannelOverflow, ColorRamp};

fn main() {
    let wrap = ColorRamp::new(ChannelOverflow::Wrap);
    let clamp = ColorRamp::new(ChannelOverflow::Clamp);

    println!("{:>9}  {:>13}  {:>13}", "intensity", "wrap", "clamp");
    for i in (0..=300).step_by(10).chain([34, 67, 100, 255, 500, 1000]) {
        let w = wrap.map(i);
        let c = clamp.map(i);
        let mark = if w != c { "  <- wraps" } else { "" };
        println!(
            "{:>9}  {:>3} {:>3} {:>3}    {:>3} {:>3} {:>3}{}",
            i, w.r, w.g, w.b, c.r, c.g, c.b, mark
        );
    }
}
