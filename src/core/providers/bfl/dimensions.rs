//! Size reconciliation for FLUX endpoints
//!
//! Clients send OpenAI-style size strings, either pixel dimensions
//! ("1024x1024") or an aspect ratio ("16:9"). The pixel-based endpoints
//! accept width/height within hard bounds and a 32px alignment; the
//! Kontext endpoints accept aspect-ratio strings directly. Resolution is
//! deterministic and idempotent: feeding a resolved value back in returns
//! it unchanged.

/// Per-endpoint dimension constraints.
#[derive(Debug, Clone, Copy)]
pub struct ProviderConstraints {
    pub min_dim: u32,
    pub max_dim: u32,
    pub align: u32,
}

/// FLUX 1.1 Pro constraints.
pub const FLUX_PIXEL_CONSTRAINTS: ProviderConstraints = ProviderConstraints {
    min_dim: 256,
    max_dim: 1440,
    align: 32,
};

const DEFAULT_SQUARE: (u32, u32) = (1024, 1024);

/// Resolve a client size string into provider-legal pixel dimensions.
///
/// Malformed input falls back to the square default rather than failing the
/// request.
pub fn resolve_pixels(size: &str, constraints: ProviderConstraints) -> (u32, u32) {
    if size.contains(':') {
        aspect_ratio_to_dimensions(size, constraints)
    } else if size.contains('x') {
        let (width, height) = parse_pair(size, 'x').unwrap_or(DEFAULT_SQUARE);
        clamp_dimensions(width, height, constraints)
    } else {
        DEFAULT_SQUARE
    }
}

/// Resolve a client size string into an aspect-ratio string for endpoints
/// that accept ratios directly.
///
/// Ratio input passes through unchanged; pixel input is reduced by the
/// greatest common divisor so the submitted terms are coprime.
pub fn resolve_aspect_ratio(size: &str) -> String {
    if size.contains(':') {
        size.to_string()
    } else if size.contains('x') {
        let (width, height) = parse_pair(size, 'x').unwrap_or(DEFAULT_SQUARE);
        let divisor = gcd(width, height);
        format!("{}:{}", width / divisor, height / divisor)
    } else {
        "1:1".to_string()
    }
}

/// Convert an aspect ratio to dimensions with the larger side pinned to the
/// endpoint maximum and the smaller side proportional, 32px aligned and
/// clamped into bounds. Extreme ratios keep the smaller side at the minimum.
fn aspect_ratio_to_dimensions(ratio: &str, constraints: ProviderConstraints) -> (u32, u32) {
    let Some((w_ratio, h_ratio)) = parse_pair(ratio, ':') else {
        return DEFAULT_SQUARE;
    };

    let max = constraints.max_dim as u64;
    let (width, height) = if w_ratio >= h_ratio {
        (
            constraints.max_dim,
            (max * h_ratio as u64 / w_ratio as u64) as u32,
        )
    } else {
        (
            (max * w_ratio as u64 / h_ratio as u64) as u32,
            constraints.max_dim,
        )
    };

    let (min, max) = (constraints.min_dim, constraints.max_dim);
    (
        round_to_align(width, constraints.align).clamp(min, max),
        round_to_align(height, constraints.align).clamp(min, max),
    )
}

/// Clamp dimensions into the endpoint bounds while preserving aspect ratio.
fn clamp_dimensions(width: u32, height: u32, constraints: ProviderConstraints) -> (u32, u32) {
    let (min, max) = (constraints.min_dim, constraints.max_dim);
    let (mut width, mut height) = (width, height);

    // Scale down if either dimension exceeds the maximum
    if width > max || height > max {
        let scale = (max as f64 / width as f64).min(max as f64 / height as f64);
        width = (width as f64 * scale) as u32;
        height = (height as f64 * scale) as u32;
    }

    // Scale up if either dimension is below the minimum
    if width < min || height < min {
        let scale = (min as f64 / width as f64).max(min as f64 / height as f64);
        width = (width as f64 * scale) as u32;
        height = (height as f64 * scale) as u32;
    }

    (
        round_to_align(width, constraints.align).clamp(min, max),
        round_to_align(height, constraints.align).clamp(min, max),
    )
}

/// Round to the nearest multiple of `align`, ties to the even multiple.
fn round_to_align(value: u32, align: u32) -> u32 {
    let quotient = value / align;
    let rounded = match (2 * (value % align)).cmp(&align) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
    };
    rounded * align
}

/// Parse a `<a><sep><b>` pair of positive integers. Zero or non-numeric
/// terms count as malformed.
fn parse_pair(input: &str, sep: char) -> Option<(u32, u32)> {
    let (a, b) = input.split_once(sep)?;
    let a = a.trim().parse::<u32>().ok().filter(|v| *v > 0)?;
    let b = b.trim().parse::<u32>().ok().filter(|v| *v > 0)?;
    Some((a, b))
}

fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
