//! HTTP span helpers.

use uuid::Uuid;

/// `"{method} {path}"` with identifiers replaced by placeholders so spans group by route.
pub(super) fn request_span_name(method: &str, path: &str) -> String {
    format!("{method} {}", normalise_path_for_span_name(path))
}

fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");
    let mut previous = "";

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else if previous == "by-number" {
            normalised.push_str("{number}");
        } else if previous == "coupons" {
            normalised.push_str("{code}");
        } else {
            normalised.push_str(segment);
        }

        previous = segment;
    }

    normalised
}
