//! Layout capacity calculations for printed source code.
//!
//! Source is set in Courier, one of the PDF base fonts, whose glyphs all share
//! the same advance width of 600 units per 1000 em. That makes the number of
//! characters which fit on a line, and the number of lines which fit on a
//! page, a matter of arithmetic instead of glyph measurement.

/// Horizontal advance of every Courier glyph, as a fraction of the font size
pub const COURIER_ADVANCE_EM: f32 = 0.6;

/// Points per inch
pub const PT_PER_IN: f32 = 72.0;

/// Width of `chars` Courier characters at `font_size_pt`
pub fn width_of_chars(chars: usize, font_size_pt: f32) -> f32 {
    chars as f32 * COURIER_ADVANCE_EM * font_size_pt
}

/// Calculates the maximum number of characters that fit on a single line
/// between the left and right margins.
pub fn calculate_max_chars_per_line(
    page_width_in: f32,
    margin_horizontal_in: f32,
    font_size_pt: f32,
) -> usize {
    let available_width_pt = (page_width_in - 2.0 * margin_horizontal_in) * PT_PER_IN;
    if available_width_pt <= 0.0 || font_size_pt <= 0.0 {
        return 0;
    }
    (available_width_pt / width_of_chars(1, font_size_pt)).floor() as usize
}

/// Calculates how many lines of text fit between the top and bottom margins.
pub fn calculate_lines_per_page(
    page_height_in: f32,
    margin_vertical_in: f32,
    line_height_pt: f32,
) -> usize {
    let available_height_pt = (page_height_in - 2.0 * margin_vertical_in) * PT_PER_IN;
    if available_height_pt <= 0.0 || line_height_pt <= 0.0 {
        return 0;
    }
    (available_height_pt / line_height_pt).floor() as usize
}
