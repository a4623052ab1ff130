//! Symbol naming transforms

use crate::core::ProcessorNaming;

/// Convert a snake_case name to PascalCase
///
/// Splits strictly on `_`, upper-cases the first character of each segment
/// and keeps the rest of the segment as written. Empty segments vanish.
///
/// ```
/// use flowsmith::plugins::extract::snake_to_pascal_case;
///
/// assert_eq!(snake_to_pascal_case("user_registration_processor"), "UserRegistrationProcessor");
/// assert_eq!(snake_to_pascal_case("single"), "Single");
/// ```
pub fn snake_to_pascal_case(input: &str) -> String {
    input
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Map a declared processor name to its implementation name
///
/// `PascalCase` drops any dotted qualifier first, so
/// `AgentProcessor.user_registration_processor` becomes
/// `UserRegistrationProcessor`.
pub fn normalize_processor(name: &str, naming: ProcessorNaming) -> String {
    match naming {
        ProcessorNaming::AsDeclared => name.to_string(),
        ProcessorNaming::PascalCase => {
            let base = name.rsplit('.').next().unwrap_or(name);
            snake_to_pascal_case(base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case_examples() {
        assert_eq!(
            snake_to_pascal_case("user_registration_processor"),
            "UserRegistrationProcessor"
        );
        assert_eq!(snake_to_pascal_case("single"), "Single");
        assert_eq!(
            snake_to_pascal_case("multi_word_long_processor"),
            "MultiWordLongProcessor"
        );
    }

    #[test]
    fn test_pascal_case_keeps_segment_tails() {
        assert_eq!(snake_to_pascal_case("send_HTTP_request"), "SendHTTPRequest");
        assert_eq!(snake_to_pascal_case("already_Pascal"), "AlreadyPascal");
        assert_eq!(snake_to_pascal_case("__double__under_"), "DoubleUnder");
        assert_eq!(snake_to_pascal_case(""), "");
    }

    #[test]
    fn test_normalize_processor() {
        assert_eq!(
            normalize_processor("AgentProcessor.user_registration_processor", ProcessorNaming::PascalCase),
            "UserRegistrationProcessor"
        );
        assert_eq!(
            normalize_processor("AgentProcessor.user_registration_processor", ProcessorNaming::AsDeclared),
            "AgentProcessor.user_registration_processor"
        );
        assert_eq!(
            normalize_processor("EmailNotificationProcessor", ProcessorNaming::PascalCase),
            "EmailNotificationProcessor"
        );
    }
}
