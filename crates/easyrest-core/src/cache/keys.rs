//! Cache key scheme.
//!
//! Keys are derived from `(slug, operation, parameters)` only, so identical
//! requests share an entry and different requests never do.

use crate::storage::PageRequest;

/// Key for a single document read.
pub fn get_key(slug: &str, id: &str) -> String {
    format!("{}.get.id-{}", slug, id)
}

/// Key for one page of a listing. Takes the normalized request.
pub fn list_key(slug: &str, request: &PageRequest) -> String {
    format!("{}.list.page-{}.size-{}", slug, request.page, request.size)
}

/// Key holding the current list generation token of a slug.
pub fn generation_key(slug: &str) -> String {
    format!("{}.list.generation", slug)
}

/// Key for one page of a listing within a list generation.
pub fn list_key_in_generation(slug: &str, generation: &str, request: &PageRequest) -> String {
    format!(
        "{}.list.gen-{}.page-{}.size-{}",
        slug, generation, request.page, request.size
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_key_format() {
        assert_eq!(get_key("mock", "6"), "mock.get.id-6");
    }

    #[test]
    fn test_list_key_uses_normalized_values() {
        let implicit = PageRequest::new(None, None);
        let explicit = PageRequest::new(Some(0), Some(30));
        assert_eq!(list_key("mock", &implicit), "mock.list.page-0.size-30");
        assert_eq!(list_key("mock", &implicit), list_key("mock", &explicit));
        assert_ne!(
            list_key("mock", &PageRequest::new(Some(1), Some(2))),
            list_key("mock", &PageRequest::new(Some(2), Some(1)))
        );
    }

    #[test]
    fn test_generation_keys_never_collide_with_plain_pages() {
        let request = PageRequest::new(None, None);
        assert_eq!(
            list_key_in_generation("mock", "0", &request),
            "mock.list.gen-0.page-0.size-30"
        );
        assert_ne!(
            list_key_in_generation("mock", "a", &request),
            list_key_in_generation("mock", "b", &request)
        );
        assert_ne!(generation_key("mock"), list_key("mock", &request));
    }

    #[test]
    fn test_keys_are_slug_scoped() {
        assert_ne!(get_key("users", "1"), get_key("orders", "1"));
    }
}
