//! Pure string-casing helpers used for store names and generated identifiers.

use convert_case::{Case, Casing};

/// `first_name` / `FirstName` → `firstName`
#[must_use]
pub fn to_lower_camel(s: &str) -> String {
    s.to_case(Case::Camel)
}

/// `first_name` → `FirstName`
#[must_use]
pub fn to_upper_camel(s: &str) -> String {
    s.to_case(Case::Pascal)
}

/// `FirstName` → `first_name`
#[must_use]
pub fn to_snake(s: &str) -> String {
    s.to_case(Case::Snake)
}

/// `firstName` → `FIRST_NAME`
#[must_use]
pub fn to_constant(s: &str) -> String {
    s.to_case(Case::Constant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casing_helpers_convert_between_conventions() {
        assert_eq!(to_lower_camel("first_name"), "firstName");
        assert_eq!(to_upper_camel("first_name"), "FirstName");
        assert_eq!(to_snake("TaskList"), "task_list");
        assert_eq!(to_constant("firstName"), "FIRST_NAME");
        assert_eq!(to_lower_camel("id"), "id");
    }
}
