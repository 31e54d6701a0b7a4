/// Pluggable TF and IDF weighting.
///
/// The vectorizer multiplies `tf(..)` by `idf(..)` for every token of a document
/// and L2-normalizes the result, so any constant factor in `tf` cancels out.
pub trait TFIDFEngine {
    /// weight of a token occurring `count` times in a document of `doc_len` tokens
    fn tf(count: u32, doc_len: u64) -> f64;
    /// weight of a token found in `doc_freq` of `doc_num` documents
    fn idf(doc_num: u64, doc_freq: u64) -> f64;
}

/// Smoothed inverse document frequency
/// idf(t) = ln((1 + N) / (1 + df(t))) + 1
///
/// Never zero, so tokens present in every document still carry some weight.
#[inline]
pub fn smooth_idf(doc_num: u64, doc_freq: u64) -> f64 {
    ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
}

/// Default engine: raw token count × smoothed idf
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn tf(count: u32, _doc_len: u64) -> f64 {
        count as f64
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        smooth_idf(doc_num, doc_freq)
    }
}

/// Sublinear engine: (1 + ln(count)) × smoothed idf
/// Damps skills repeated many times inside one occupation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SublinearTFIDFEngine;

impl TFIDFEngine for SublinearTFIDFEngine {
    #[inline]
    fn tf(count: u32, _doc_len: u64) -> f64 {
        if count == 0 {
            0.0
        } else {
            1.0 + (count as f64).ln()
        }
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        smooth_idf(doc_num, doc_freq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_idf_values() {
        // token in every document -> exactly 1
        assert!((smooth_idf(4, 4) - 1.0).abs() < 1e-12);
        // token in one of two documents
        assert!((smooth_idf(2, 1) - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        // rarer tokens weigh more
        assert!(smooth_idf(10, 1) > smooth_idf(10, 5));
    }

    #[test]
    fn sublinear_tf_damps_repeats() {
        assert_eq!(SublinearTFIDFEngine::tf(0, 3), 0.0);
        assert_eq!(SublinearTFIDFEngine::tf(1, 3), 1.0);
        assert!(SublinearTFIDFEngine::tf(4, 3) < DefaultTFIDFEngine::tf(4, 3));
    }
}
