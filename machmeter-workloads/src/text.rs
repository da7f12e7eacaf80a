//! Text search workload: Boyer-Moore-Horspool over the Hamlet text.

use machmeter_core::{ExecutionError, WorkloadContext};

const NEEDLES: [&str; 8] = [
    "Hamlet", "Horatio", "Ophelia", "Denmark", "king", "queen", "ghost", "madness",
];
const CHUNKS_PER_WORKER: usize = 4;

/// Count occurrences of a fixed needle set in the injected `hamlet`
/// dataset, partitioned on line boundaries so no needle can straddle a
/// chunk edge.
pub fn hamlet_word_count(ctx: &WorkloadContext) -> Result<(), ExecutionError> {
    let chunks = split_on_lines(ctx.dataset("hamlet")?, ctx.workers() * CHUNKS_PER_WORKER);

    let counts = ctx.map(count_chunk, chunks)?;

    let total: usize = counts.iter().sum();
    if total == 0 {
        return Err(ExecutionError::workload("no needle occurs in the text"));
    }
    Ok(())
}

fn count_chunk(chunk: Vec<u8>) -> Result<usize, ExecutionError> {
    Ok(NEEDLES
        .iter()
        .map(|needle| horspool_count(&chunk, needle.as_bytes()))
        .sum())
}

/// Count (possibly overlapping) occurrences of `needle` in `haystack`
/// using the Horspool bad-character shift.
fn horspool_count(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }

    let mut shift = [needle.len(); 256];
    for (i, &b) in needle[..needle.len() - 1].iter().enumerate() {
        shift[b as usize] = needle.len() - 1 - i;
    }

    let mut count = 0;
    let mut pos = 0;
    while pos + needle.len() <= haystack.len() {
        if &haystack[pos..pos + needle.len()] == needle {
            count += 1;
        }
        pos += shift[haystack[pos + needle.len() - 1] as usize];
    }
    count
}

/// Split into at most `parts` chunks, extending each to the next newline.
/// Needles never contain a newline, so per-chunk counts sum to the
/// whole-text count for any partitioning.
fn split_on_lines(textual: &[u8], parts: usize) -> Vec<Vec<u8>> {
    let target = textual.len().div_ceil(parts.max(1)).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < textual.len() {
        let mut end = (start + target).min(textual.len());
        while end < textual.len() && textual[end - 1] != b'\n' {
            end += 1;
        }
        chunks.push(textual[start..end].to_vec());
        start = end;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use machmeter_core::{DatasetMap, ExecStrategy, WorkloadContext};

    #[test]
    fn horspool_counts_plain_occurrences() {
        assert_eq!(horspool_count(b"the king, the king's men", b"king"), 2);
        assert_eq!(horspool_count(b"no match here", b"queen"), 0);
        assert_eq!(horspool_count(b"aaaa", b"aa"), 3);
        assert_eq!(horspool_count(b"short", b"much longer needle"), 0);
        assert_eq!(horspool_count(b"anything", b""), 0);
    }

    #[test]
    fn chunked_counts_match_whole_text_counts() {
        let play = b"the ghost appears\nthe king speaks\nthe queen departs\nmadness follows\n";
        let whole: usize = NEEDLES
            .iter()
            .map(|n| horspool_count(play, n.as_bytes()))
            .sum();

        for parts in [1, 2, 3, 8] {
            let chunked: usize = split_on_lines(play, parts)
                .into_iter()
                .map(|c| count_chunk(c).unwrap())
                .sum();
            assert_eq!(chunked, whole, "parts={parts}");
        }
    }

    #[test]
    fn split_reassembles_to_the_original() {
        let play = b"a\nbb\nccc\ndddd\neeeee\n";
        let rejoined: Vec<u8> = split_on_lines(play, 3).concat();
        assert_eq!(rejoined, play);
    }

    #[test]
    fn workload_runs_against_an_injected_fixture() {
        let strategy = ExecStrategy::Serial;
        let mut datasets = DatasetMap::new();
        datasets.insert(
            "hamlet".to_string(),
            b"the king is here\nthe queen is not\n".to_vec(),
        );
        let ctx = WorkloadContext::new(&strategy, &datasets);
        hamlet_word_count(&ctx).unwrap();
    }

    #[test]
    fn missing_dataset_is_reported() {
        let strategy = ExecStrategy::Serial;
        let datasets = DatasetMap::new();
        let ctx = WorkloadContext::new(&strategy, &datasets);
        let err = hamlet_word_count(&ctx).unwrap_err();
        assert!(matches!(err, ExecutionError::MissingDataset(name) if name == "hamlet"));
    }
}
