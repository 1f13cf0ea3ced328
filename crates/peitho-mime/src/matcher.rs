//! Quality-value matching over parsed media ranges.

use crate::range::MediaRange;

/// The fitness and quality a header assigns to one concrete media type:
/// the specificity score of the best-matching range and that range's `q`.
fn fitness_and_quality(candidate: &MediaRange, ranges: &[MediaRange]) -> (u32, f32) {
    let mut best: Option<(u32, f32)> = None;
    for range in ranges {
        if let Some(fitness) = range.fitness(candidate) {
            match best {
                Some((f, _)) if f >= fitness => {}
                _ => best = Some((fitness, range.quality())),
            }
        }
    }
    best.unwrap_or((0, 0.0))
}

/// Picks the best match for `header` among `supported` media types.
///
/// `supported` is ordered highest priority first. A candidate is viable
/// only when some header range matches it with a non-zero quality; among
/// viable candidates the highest quality wins, ties broken by specificity
/// of the matching range, then by configured order (earlier wins).
///
/// Returns `None` when the header rates every supported type at zero or
/// matches none of them.
pub fn best_match<'a, I>(supported: I, header: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    best_match_in(supported, &MediaRange::parse_header(header))
}

/// [`best_match`] over already-parsed header ranges, for callers that need
/// to inspect the ranges themselves as well.
pub(crate) fn best_match_in<'a, I>(supported: I, ranges: &[MediaRange]) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if ranges.is_empty() {
        return None;
    }

    let mut winner: Option<(f32, u32, String)> = None;
    for candidate in supported {
        let Some(parsed) = MediaRange::parse(candidate) else {
            continue;
        };
        let (fitness, quality) = fitness_and_quality(&parsed, ranges);
        if quality <= 0.0 {
            continue;
        }
        let better = match &winner {
            Some((q, f, _)) => quality > *q || (quality == *q && fitness > *f),
            None => true,
        };
        if better {
            winner = Some((quality, fitness, candidate.to_string()));
        }
    }
    winner.map(|(_, _, media_type)| media_type)
}

/// The quality a header assigns to one concrete media type, 0.0 when the
/// header matches it with `q=0` or not at all.
pub fn quality(media_type: &str, header: &str) -> f32 {
    let Some(candidate) = MediaRange::parse(media_type) else {
        return 0.0;
    };
    fitness_and_quality(&candidate, &MediaRange::parse_header(header)).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_match_wins() {
        let matched = best_match(
            ["application/json"],
            "application/json,application/xml;q=0.9,*/*;q=0.8",
        );
        assert_eq!(matched.as_deref(), Some("application/json"));
    }

    #[test]
    fn falls_through_wildcard() {
        let matched = best_match(["application/json"], "text/html;q=1,*/*;q=0.8");
        assert_eq!(matched.as_deref(), Some("application/json"));
    }

    #[test]
    fn explicit_zero_wildcard_excludes() {
        assert_eq!(best_match(["application/json"], "text/html;q=1,*/*;q=0"), None);
    }

    #[test]
    fn higher_quality_wins_over_configured_order() {
        let matched = best_match(
            ["application/xml", "application/json"],
            "application/json;q=1,application/xml;q=0.5",
        );
        assert_eq!(matched.as_deref(), Some("application/json"));
    }

    #[test]
    fn configured_order_breaks_quality_ties() {
        let matched = best_match(["application/xml", "application/json"], "*/*");
        assert_eq!(matched.as_deref(), Some("application/xml"));
    }

    #[test]
    fn specificity_breaks_ties_before_order() {
        // text/html is matched exactly, application/json only via */*;
        // both at q=1, so the more specific match wins despite order.
        let matched = best_match(["application/json", "text/html"], "text/html,*/*");
        assert_eq!(matched.as_deref(), Some("text/html"));
    }

    #[test]
    fn no_ranges_means_no_match() {
        assert_eq!(best_match(["application/json"], ""), None);
        assert_eq!(best_match(["application/json"], "garbage"), None);
    }

    #[test]
    fn quality_reads_the_matching_range() {
        assert_eq!(quality("*/*", "text/html;q=1,*/*;q=0"), 0.0);
        assert_eq!(quality("*/*", "application/json"), 1.0);
        assert_eq!(quality("text/html", "text/*;q=0.3"), 0.3);
        assert_eq!(quality("text/html", "image/png"), 0.0);
    }

    proptest! {
        #[test]
        fn parsing_arbitrary_headers_never_panics(header in ".{0,200}") {
            let _ = best_match(["application/json"], &header);
            let _ = quality("application/json", &header);
        }

        #[test]
        fn supported_type_listed_verbatim_is_matched(
            sub in "[a-z]{1,10}",
        ) {
            let media = format!("application/{sub}");
            let matched = best_match([media.as_str()], &media);
            prop_assert_eq!(matched, Some(media));
        }
    }
}
