//! Box-drawn terminal status panel, refreshed once per tick.

/// Display columns between the two border glyphs.
const INNER_WIDTH: usize = 56;
/// Object names longer than this are cut to keep the box intact.
const NAME_WIDTH: usize = 44;

/// Renders the full status panel for one tracked (or idle) object.
pub fn render(name: &str, altitude_deg: f64, azimuth_deg: f64, range_km: f64, visible: bool) -> String {
    let status = if visible { "VISIBLE" } else { "BELOW HORIZON" };
    let name: String = name.chars().take(NAME_WIDTH).collect();

    let mut out = String::new();
    out.push_str(&border('╔', '╗'));
    out.push_str(&row_centered("SPACE DEBRIS TRACKER"));
    out.push_str(&border('╠', '╣'));
    out.push_str(&row(&format!("Object:    {name}")));
    out.push_str(&row(&format!("Altitude:  {altitude_deg:8.2}°")));
    out.push_str(&row(&format!("Azimuth:   {azimuth_deg:8.2}°")));
    out.push_str(&row(&format!("Distance:  {range_km:8.1} km")));
    out.push_str(&row(&format!("Status:    {status}")));
    out.push_str(&border('╚', '╝'));
    out.push_str("Press Ctrl+C to stop tracking\n");
    out
}

fn border(left: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for _ in 0..INNER_WIDTH {
        line.push('═');
    }
    line.push(right);
    line.push('\n');
    line
}

fn row(content: &str) -> String {
    let pad = INNER_WIDTH.saturating_sub(content.chars().count() + 1);
    format!("║ {}{}║\n", content, " ".repeat(pad))
}

fn row_centered(content: &str) -> String {
    let pad = INNER_WIDTH.saturating_sub(content.chars().count());
    let left = pad / 2;
    format!(
        "║{}{}{}║\n",
        " ".repeat(left),
        content,
        " ".repeat(pad - left)
    )
}
