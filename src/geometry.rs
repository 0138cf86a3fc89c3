use thiserror::Error;

// ---------------------------------------------------------------------------
// Slope of a cross-section line
// ---------------------------------------------------------------------------

/// Degenerate geometry passed to [`slope_degrees`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SlopeError {
    /// Both points share the same first coordinate, so the slope is undefined.
    #[error("vertical line at x = {x}: slope is undefined")]
    VerticalLine { x: f64 },
}

/// Angle in degrees of the line from `start` to `end`, each `(x, y)` in the
/// same linear unit.
///
/// The result lies strictly between -90 and 90. Points sharing an `x`
/// (coincident points included) are rejected as a vertical line.
pub fn slope_degrees(start: (f64, f64), end: (f64, f64)) -> Result<f64, SlopeError> {
    let (x1, y1) = start;
    let (x2, y2) = end;

    let rise = y2 - y1;
    let run = x2 - x1;
    if run == 0.0 {
        return Err(SlopeError::VerticalLine { x: x1 });
    }

    Ok((rise / run).atan().to_degrees())
}
