// src/scrape/line.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::Quartile;

static GENERATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Processing generation: ([0-9]+)").expect("generation pattern"));

// e.g. "First quartile:  0.93203884" or "Median (sample 1): 0.5"
static QUARTILE_RES: Lazy<[(Quartile, Regex); 3]> = Lazy::new(|| {
    let re = |name: &str| {
        Regex::new(&format!(r"^{}(?:\s+\(sample 1\))?:\s+([0-9]+\.[0-9]+)", name))
            .expect("quartile pattern")
    };
    [
        (Quartile::First, re("First quartile")),
        (Quartile::Median, re("Median")),
        (Quartile::Third, re("Third quartile")),
    ]
});

/// The generation most recently announced by the log. Starts undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    pub generation: Option<u64>,
}

/// A quartile line, stamped with the generation in effect when it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct QuartileSample {
    pub generation: Option<u64>,
    pub quartile: Quartile,
    pub value: f64,
    pub raw_value: String,
}

/// Feed one line through the scan. A generation marker only affects lines
/// after it; lines matching nothing leave the state untouched. A marker too
/// large to represent resets the generation to undefined.
pub fn scan_line(state: ScanState, line: &str) -> (ScanState, Option<QuartileSample>) {
    let line = line.trim();
    let mut state = state;

    if let Some(caps) = GENERATION_RE.captures(line) {
        match caps[1].parse::<u64>() {
            Ok(g) => state.generation = Some(g),
            Err(e) => {
                warn!(line, error = %e, "generation number out of range; generation now undefined");
                state.generation = None;
            }
        }
    }

    for (quartile, re) in QUARTILE_RES.iter() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let raw = &caps[1];
        // ASCII digits with a point always parse; huge ones round to infinity
        let value = raw.parse::<f64>().unwrap_or(f64::NAN);
        if state.generation.is_none() {
            warn!(line, "quartile before any generation marker; emitting with no generation");
        }
        return (
            state,
            Some(QuartileSample {
                generation: state.generation,
                quartile: *quartile,
                value,
                raw_value: raw.to_string(),
            }),
        );
    }

    (state, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(text: &str) -> Vec<QuartileSample> {
        let mut state = ScanState::default();
        let mut out = Vec::new();
        for line in text.lines() {
            let (next, sample) = scan_line(state, line);
            state = next;
            out.extend(sample);
        }
        out
    }

    #[test]
    fn test_generation_marker_updates_state_only() {
        let (state, sample) = scan_line(ScanState::default(), "Processing generation: 42");
        assert_eq!(state.generation, Some(42));
        assert!(sample.is_none());
    }

    #[test]
    fn test_quartiles_take_current_generation() {
        let samples = scan_all("Processing generation: 3\nFirst quartile: 0.50\nMedian: 0.75\n");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].generation, Some(3));
        assert_eq!(samples[0].quartile, Quartile::First);
        assert_eq!(samples[0].raw_value, "0.50");
        assert_eq!(samples[1].quartile, Quartile::Median);
        assert_eq!(samples[1].value, 0.75);
    }

    #[test]
    fn test_sample_suffix_and_whitespace() {
        let samples = scan_all(
            "  Processing generation: 7  \nFirst quartile (sample 1):  0.93203884\nThird quartile   (sample 1):\t1.0\n",
        );
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].raw_value, "0.93203884");
        assert_eq!(samples[1].quartile, Quartile::Third);
        assert!(samples.iter().all(|s| s.generation == Some(7)));
    }

    #[test]
    fn test_unrecognised_lines_ignored() {
        let samples = scan_all(
            "Processing generation: 1\nBest program: (1 2 3)\nMedian: 12\nThe median: 0.4\nmedian: 0.4\nSecond quartile: 0.3\n",
        );
        // "Median: 12" has no decimal point, the rest are not quartile markers
        assert!(samples.is_empty());
    }

    #[test]
    fn test_quartile_before_generation_has_no_generation() {
        let samples = scan_all("Median: 0.10\nProcessing generation: 0\nMedian: 0.20\n");
        assert_eq!(samples[0].generation, None);
        assert_eq!(samples[1].generation, Some(0));
    }

    #[test]
    fn test_oversized_generation_clears_previous() {
        let samples = scan_all(
            "Processing generation: 3\nProcessing generation: 99999999999999999999999\nMedian: 0.5\n",
        );
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].generation, None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_quartiles() {
        let samples = scan_all(
            "Processing generation: \u{661}\nProcessing generation: 1\nMedian: \u{660}.\u{665}\nMedian: 0.5\n",
        );
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].raw_value, "0.5");
        assert_eq!(samples[0].generation, Some(1));
    }

    #[test]
    fn test_generations_follow_latest_marker() {
        let text = "Processing generation: 0\nFirst quartile: 0.1\nMedian: 0.2\n\
                    Processing generation: 1\nThird quartile: 0.3\n\
                    Processing generation: 2\nnoise\nFirst quartile: 0.4\n";
        let gens: Vec<_> = scan_all(text).into_iter().map(|s| s.generation).collect();
        assert_eq!(gens, vec![Some(0), Some(0), Some(1), Some(2)]);
        assert!(gens.windows(2).all(|w| w[0] <= w[1]));
    }
}
