//! Key strategies: exact request hashing and feature-vector similarity
//!
//! Exact keys are a content hash of the canonical JSON form of a request, so
//! the same logical request maps to the same key whatever its field order.
//! Similarity caches instead keep the [`FeatureVector`] next to the value and
//! compare vectors at lookup time.

use serde::Serialize;
use serde_json::Value;

use super::error::CacheError;

/// How a cache identifies entries
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum KeyStrategy {
    /// Direct lookup by a derived string key
    #[default]
    Exact,
    /// Best-match lookup over stored feature vectors
    Similarity {
        /// Minimum score (mean of `1 - |a_i - b_i|`) counted as a hit
        threshold: f64,
    },
}

impl KeyStrategy {
    /// Whether lookups compare feature vectors
    pub fn is_similarity(&self) -> bool {
        matches!(self, Self::Similarity { .. })
    }
}

/// Serialize a JSON value with object keys sorted at every level
///
/// # Example
/// ```
/// use predcache_common::cache::canonical_json;
/// use serde_json::json;
///
/// let a = canonical_json(&json!({"b": 1, "a": {"d": 2, "c": 3}}));
/// assert_eq!(a, r#"{"a":{"c":3,"d":2},"b":1}"#);
/// ```
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(inner) = map.get(key) {
                    write_canonical(inner, out);
                }
            }
            out.push('}');
        }
        leaf => out.push_str(&leaf.to_string()),
    }
}

/// Derive an exact cache key from any serializable request shape
///
/// The key is `namespace:` followed by the 64-character BLAKE3 hex digest of
/// the canonical JSON form.
///
/// # Errors
/// Returns [`CacheError::KeyDerivation`] if the request cannot be serialized.
///
/// # Example
/// ```
/// use predcache_common::cache::exact_key;
/// use serde_json::json;
///
/// let a = exact_key("query", &json!({"league": "EPL", "season": 2024})).unwrap();
/// let b = exact_key("query", &json!({"season": 2024, "league": "EPL"})).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn exact_key<T>(namespace: &str, request: &T) -> Result<String, CacheError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(request)?;
    let digest = blake3::hash(canonical_json(&value).as_bytes());
    if namespace.is_empty() {
        Ok(digest.to_hex().to_string())
    } else {
        Ok(format!("{}:{}", namespace, digest.to_hex()))
    }
}

/// Mean per-component closeness of two equal-length vectors
///
/// Returns `None` when the lengths differ or the vectors are empty; vectors
/// of different dimensionality never match.
pub fn similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let total: f64 = a.iter().zip(b).map(|(x, y)| 1.0 - (x - y).abs()).sum();
    Some(total / a.len() as f64)
}

/// Ordered feature values, each normalized into `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Create a feature vector, rejecting values outside `[0, 1]`
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidFeatures`] for an empty vector or any
    /// non-finite or out-of-range component.
    pub fn new(values: Vec<f64>) -> Result<Self, CacheError> {
        Self::check_finite(&values)?;
        if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !(0.0..=1.0).contains(*v)) {
            return Err(CacheError::InvalidFeatures(format!(
                "component {} is {}, expected a value in [0, 1]",
                i, v
            )));
        }
        Ok(Self(values))
    }

    /// Create a feature vector, clamping finite values into `[0, 1]`
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidFeatures`] for an empty vector or any
    /// non-finite component.
    pub fn clamped(values: Vec<f64>) -> Result<Self, CacheError> {
        Self::check_finite(&values)?;
        Ok(Self(values.into_iter().map(|v| v.clamp(0.0, 1.0)).collect()))
    }

    fn check_finite(values: &[f64]) -> Result<(), CacheError> {
        if values.is_empty() {
            return Err(CacheError::InvalidFeatures("vector is empty".to_string()));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(CacheError::InvalidFeatures(format!("component {} is not finite", i)));
        }
        Ok(())
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; empty vectors are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the components
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Similarity score against another vector, `None` on length mismatch
    pub fn similarity(&self, other: &Self) -> Option<f64> {
        similarity(&self.0, &other.0)
    }

    /// Stable key for storing this vector in a similarity cache
    pub fn cache_key(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for v in &self.0 {
            hasher.update(&v.to_bits().to_le_bytes());
        }
        format!("fv:{}", hasher.finalize().to_hex())
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = CacheError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::key.
    use serde_json::json;

    use super::*;

    /// Validates `exact_key` for the field order independence scenario.
    ///
    /// Assertions:
    /// - Confirms differently ordered nested objects produce the same key.
    /// - Confirms a different value produces a different key.
    /// - Confirms the digest part is 64 hex characters.
    #[test]
    fn test_exact_key_ignores_field_order() {
        let a = exact_key("resp", &json!({"path": "/odds", "query": {"b": 2, "a": 1}})).unwrap();
        let b = exact_key("resp", &json!({"query": {"a": 1, "b": 2}, "path": "/odds"})).unwrap();
        let c = exact_key("resp", &json!({"query": {"a": 1, "b": 3}, "path": "/odds"})).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.trim_start_matches("resp:").len(), 64);
    }

    /// Validates `exact_key` namespacing.
    ///
    /// Assertions:
    /// - Confirms the same request under two namespaces yields two keys.
    /// - Confirms an empty namespace yields a bare digest.
    #[test]
    fn test_exact_key_namespaces() {
        let request = json!({"id": 7});
        assert_ne!(exact_key("a", &request).unwrap(), exact_key("b", &request).unwrap());
        assert_eq!(exact_key("", &request).unwrap().len(), 64);
    }

    /// Validates `canonical_json` array handling.
    ///
    /// Assertions:
    /// - Confirms array order is preserved while object keys are sorted.
    #[test]
    fn test_canonical_json_preserves_array_order() {
        let value = json!([{"z": 1, "y": 2}, 3, "x"]);
        assert_eq!(canonical_json(&value), r#"[{"y":2,"z":1},3,"x"]"#);
    }

    /// Validates `similarity` on the reference vectors.
    ///
    /// Assertions:
    /// - Ensures a near-identical vector scores above 0.95.
    /// - Ensures one component off by 0.5 scores below 0.95.
    /// - Ensures mismatched lengths return `None`.
    #[test]
    fn test_similarity_scores() {
        let stored = [0.7, 0.65, 0.6, 0.75, 0.7, 0.5, 0.8];
        let near = [0.71, 0.64, 0.6, 0.75, 0.7, 0.5, 0.8];
        let far = [0.2, 0.65, 0.6, 0.75, 0.7, 0.5, 0.8];

        assert!(similarity(&stored, &near).unwrap() >= 0.95);
        assert!(similarity(&stored, &far).unwrap() < 0.95);
        assert_eq!(similarity(&stored, &stored[..3]), None);
        assert_eq!(similarity(&[], &[]), None);
    }

    /// Validates `FeatureVector::new` and `FeatureVector::clamped`.
    ///
    /// Assertions:
    /// - Ensures out-of-range values are rejected by `new`.
    /// - Confirms `clamped` pulls values into range.
    /// - Ensures NaN and empty vectors are rejected by both.
    #[test]
    fn test_feature_vector_construction() {
        assert!(FeatureVector::new(vec![0.2, 1.2]).is_err());
        assert_eq!(FeatureVector::clamped(vec![-0.5, 1.2]).unwrap().as_slice(), &[0.0, 1.0]);
        assert!(FeatureVector::new(vec![f64::NAN]).is_err());
        assert!(FeatureVector::clamped(vec![f64::INFINITY]).is_err());
        assert!(matches!(FeatureVector::new(Vec::new()), Err(CacheError::InvalidFeatures(_))));
    }

    /// Validates `FeatureVector::cache_key` stability.
    ///
    /// Assertions:
    /// - Confirms equal vectors share a key.
    /// - Confirms different vectors get different keys.
    #[test]
    fn test_feature_vector_cache_key() {
        let a = FeatureVector::new(vec![0.1, 0.2]).unwrap();
        let b = FeatureVector::new(vec![0.1, 0.2]).unwrap();
        let c = FeatureVector::new(vec![0.1, 0.3]).unwrap();

        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
        assert!(a.cache_key().starts_with("fv:"));
    }
}
