//! Numeric conversion helpers used across the project.
//!
//! Guards the float-to-integer conversions at the world/grid boundary so
//! call-sites stay ergonomic while debug builds flag unexpected overflow.

/// Floors a finite `f32` and clamps it into the `i32` domain.
///
/// # Examples
///
/// ```
/// use gully::numeric::floor_to_i32;
/// assert_eq!(floor_to_i32(17.9), 17);
/// assert_eq!(floor_to_i32(-0.1), -1);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn floor_to_i32(value: f32) -> i32 {
    debug_assert!(value.is_finite(), "expected finite f32 for i32 conversion");
    let floored = value.floor();
    let clamped = floored.clamp(i32::MIN as f32, i32::MAX as f32);
    clamped as i32
}

/// Last grid index covered by the half-open span `[start, start + len)`.
///
/// Spans that end exactly on a grid line do not reach into the next cell,
/// so a collider resting flush against a tile boundary only occupies the
/// cells it geometrically covers.
#[must_use]
pub fn span_last_cell(start: f32, len: f32, cell_size: f32) -> i32 {
    debug_assert!(cell_size > 0.0, "cell size must be positive");
    let first = floor_to_i32(start / cell_size);
    let last = floor_to_i32(((start + len) / cell_size).ceil()) - 1;
    last.max(first)
}
