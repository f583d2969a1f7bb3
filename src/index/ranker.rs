use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::index::matrix::TfIdfMatrix;

#[derive(Debug, Clone, PartialEq)]
struct Scored {
    similarity: f32,
    doc_id: String,
}

impl Eq for Scored {}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.similarity.total_cmp(&other.similarity)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Ranks every row of `matrix` against `query_vector` by cosine
/// similarity, keeping only the top `k` in a bounded min-heap so
/// memory stays O(k) regardless of corpus size. Rows with zero or
/// negative similarity are skipped.
pub fn topk(matrix: &TfIdfMatrix, query_vector: &[f32], k: usize) -> Vec<String> {
    if k == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<Scored>> = BinaryHeap::with_capacity(k + 1);

    for row in &matrix.rows {
        let similarity = cosine_similarity(query_vector, &row.values);
        if similarity <= 0.0 {
            continue;
        }
        heap.push(Reverse(Scored { similarity, doc_id: row.doc_id.clone() }));
        if heap.len() > k {
            heap.pop();
        }
    }

    let mut ranked: Vec<Scored> = heap.into_iter().map(|Reverse(s)| s).collect();
    ranked.sort_by(|a, b| b.cmp(a));
    ranked.into_iter().map(|s| s.doc_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::matrix::DocVector;

    fn row(doc_id: &str, values: &[f32]) -> DocVector {
        DocVector { doc_id: doc_id.to_string(), values: values.to_vec() }
    }

    #[test]
    fn topk_orders_by_descending_similarity() {
        let matrix = TfIdfMatrix::new(vec![
            row("low", &[1.0, 0.0]),
            row("high", &[2.0, 2.0]),
            row("zero", &[0.0, 0.0]),
        ]);
        let query = vec![1.0, 1.0];
        let results = topk(&matrix, &query, 2);
        assert_eq!(results, vec!["high".to_string(), "low".to_string()]);
    }

    #[test]
    fn topk_zero_k_returns_empty() {
        let matrix = TfIdfMatrix::new(vec![row("a", &[1.0])]);
        assert!(topk(&matrix, &[1.0], 0).is_empty());
    }
}
