use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::constants::{ALLOWED_MIME_TYPES, UNKNOWN_FILE_NAME};

/// Last path component of a client-supplied file name. Both `/` and `\`
/// count as separators since browsers on Windows may send full paths. Control
/// characters are dropped so the name is safe to log and display.
pub fn sanitize_base_name(file_name: &str) -> String {
    let base: String = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    let base = base.trim();
    if base.is_empty() || base == "." || base == ".." {
        UNKNOWN_FILE_NAME.to_string()
    } else {
        base.to_string()
    }
}

pub fn safe_extension(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Only the declared type is checked; the content is not sniffed.
pub fn is_allowed_mime(content_type: Option<&str>) -> bool {
    match content_type {
        Some(mime) => ALLOWED_MIME_TYPES
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime.trim())),
        None => false,
    }
}

pub fn is_image_name(saved_name: &str) -> bool {
    mime_guess::from_path(saved_name)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}

/// Decodes plain base64 or a `data:<type>;base64,<payload>` URL.
pub fn decode_data_url(input: &str) -> Option<Vec<u8>> {
    let payload = match input.strip_prefix("data:") {
        Some(rest) => rest.split_once(";base64,")?.1,
        None => input,
    };
    STANDARD.decode(payload.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(sanitize_base_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_base_name("C:\\Users\\al\\cat.png"), "cat.png");
        assert_eq!(sanitize_base_name("cat.png"), "cat.png");
        assert_eq!(sanitize_base_name("dir/"), UNKNOWN_FILE_NAME);
        assert_eq!(sanitize_base_name(".."), UNKNOWN_FILE_NAME);
    }

    #[test]
    fn base_name_drops_control_characters() {
        assert_eq!(
            sanitize_base_name("cat.png\n[INFO] admin logged in\r"),
            "cat.png[INFO] admin logged in"
        );
        assert_eq!(sanitize_base_name("a\u{1b}[31m.png"), "a[31m.png");
        assert_eq!(sanitize_base_name("\t\n"), UNKNOWN_FILE_NAME);
    }

    #[test]
    fn allow_list() {
        assert!(is_allowed_mime(Some("image/png")));
        assert!(is_allowed_mime(Some("IMAGE/JPEG")));
        assert!(is_allowed_mime(Some(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        )));
        assert!(!is_allowed_mime(Some("text/html")));
        assert!(!is_allowed_mime(None));
    }

    #[test]
    fn image_names() {
        assert!(is_image_name("a.png"));
        assert!(is_image_name("a.jpeg"));
        assert!(!is_image_name("a.pdf"));
        assert!(!is_image_name("a"));
    }

    #[test]
    fn data_urls() {
        assert_eq!(decode_data_url("data:image/png;base64,aGk=").unwrap(), b"hi");
        assert_eq!(decode_data_url("aGk=").unwrap(), b"hi");
        assert!(decode_data_url("data:image/png,aGk=").is_none());
        assert!(decode_data_url("***").is_none());
    }
}
