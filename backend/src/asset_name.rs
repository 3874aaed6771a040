use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

/// Number of random bytes behind every asset name
pub const ASSET_ID_BYTES: usize = 32;

/// Mints a fresh asset name `{id}.{extension}`.
///
/// The id is 32 bytes from the OS random source, encoded as URL-safe base64 without
/// padding, so it never contains `/` or `+` and is safe as a path segment or object key.
#[must_use]
pub fn mint(extension: &str) -> String {
    let mut bytes = [0u8; ASSET_ID_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!("{}.{extension}", URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_name_shape() {
        let name = mint("png");
        let (id, extension) = name.split_once('.').unwrap();

        assert_eq!(extension, "png");
        assert_eq!(id.len(), 43);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(URL_SAFE_NO_PAD.decode(id).unwrap().len(), ASSET_ID_BYTES);
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<String> = (0..10_000).map(|_| mint("mp4")).collect();
        assert_eq!(names.len(), 10_000);
    }
}
