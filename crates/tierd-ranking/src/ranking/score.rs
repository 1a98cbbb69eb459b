//! Score functions.
//!
//! All functions here are pure and total: empty samples score zero and
//! elapsed times below zero are treated as zero.

/// z for a 95% confidence interval.
pub const WILSON_Z_95: f64 = 1.96;

/// Lower bound of the Wilson score interval at 95% confidence.
///
/// Ranks by how confident we are that a product is liked rather than by
/// raw vote difference, so ten upvotes out of ten beat one out of one.
pub fn wilson_score(upvotes: u64, total: u64) -> f64 {
    wilson_score_with_z(upvotes, total, WILSON_Z_95)
}

/// Lower bound of the Wilson score interval for a given z.
///
/// `upvotes` above `total` are clamped to `total`.
pub fn wilson_score_with_z(upvotes: u64, total: u64, z: f64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let n = total as f64;
    let p = upvotes.min(total) as f64 / n;
    let z2 = z * z;

    let center = p + z2 / (2.0 * n);
    let margin = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();
    let denominator = 1.0 + z2 / n;

    ((center - margin) / denominator).clamp(0.0, 1.0)
}

/// Recency factor in `(0, 1]`: `1 / (1 + ln(1 + hours))`.
///
/// Equals 1 right after the event and decays slowly afterwards.
pub fn time_decay(hours: f64) -> f64 {
    1.0 / (1.0 + (1.0 + hours.max(0.0)).ln())
}

/// Net votes weighted by recency.
pub fn trending_score(net_votes: i64, hours: f64) -> f64 {
    net_votes as f64 * time_decay(hours)
}

/// Blend a vote score in `[0, 1]`-ish range with a 0-5 star rating.
///
/// Products without a rating, or a zero weight, keep the vote score as is.
pub fn blend_rating(vote_score: f64, average_rating: Option<f32>, rating_weight: f64) -> f64 {
    match average_rating {
        Some(rating) if rating_weight > 0.0 => {
            let normalized = (f64::from(rating) / 5.0).clamp(0.0, 1.0);
            (1.0 - rating_weight) * vote_score + rating_weight * normalized
        }
        _ => vote_score,
    }
}
