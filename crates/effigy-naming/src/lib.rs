//! Naming conventions for effigy schema objects.
//!
//! Every name the builder synthesizes (default table names, index names,
//! association tables and their columns, foreign-key constraints) is derived
//! here so that all crates agree on the same spelling. The crate has no
//! dependencies.

// ============================================================================
// Table Naming
// ============================================================================

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Pluralize an (already lower-cased) entity name.
///
/// # Examples
/// ```
/// use effigy_naming::pluralize;
///
/// assert_eq!(pluralize("post"), "posts");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("day"), "days");
/// assert_eq!(pluralize("box"), "boxes");
/// assert_eq!(pluralize("match"), "matches");
/// ```
pub fn pluralize(name: &str) -> String {
    let mut chars = name.chars().rev();
    let last = chars.next();
    let before_last = chars.next();
    let after_consonant = before_last.is_some_and(|c| !is_vowel(c));

    match last {
        Some('y') if after_consonant => format!("{}ies", &name[..name.len() - 1]),
        Some('z') if after_consonant => format!("{}zes", name),
        _ if ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|suffix| name.ends_with(suffix)) =>
        {
            format!("{}es", name)
        }
        _ => format!("{}s", name),
    }
}

/// Default table name for an entity: the lower-cased entity name, pluralized.
///
/// # Examples
/// ```
/// use effigy_naming::default_table_name;
///
/// assert_eq!(default_table_name("Post"), "posts");
/// assert_eq!(default_table_name("OrderLine"), "orderlines");
/// ```
pub fn default_table_name(entity: &str) -> String {
    pluralize(&entity.to_lowercase())
}

// ============================================================================
// Index Naming
// ============================================================================

/// Generate an index name from table name and indexed fields.
/// Format: `ix_{table}_{field1}_{field2}...` or `uq_{table}_...` for unique indexes.
/// Fields keep the order in which they were declared.
pub fn build_index_name(table: &str, fields: &[String], unique: bool) -> String {
    let prefix = if unique { "uq" } else { "ix" };
    format!("{}_{}_{}", prefix, table, fields.join("_"))
}

// ============================================================================
// Association Naming (many-to-many)
// ============================================================================

/// Name of the association table joining two tables.
/// Both table names are sorted so either declaration side yields the same name.
pub fn build_association_table_name(left: &str, right: &str) -> String {
    let (first, second) = if left <= right {
        (left, right)
    } else {
        (right, left)
    };
    format!("{}_{}", first, second)
}

/// Name of the association column pointing at `table`'s primary key column.
/// Format: `{table}_{pk_column}`
pub fn build_association_column_name(table: &str, pk_column: &str) -> String {
    format!("{}_{}", table, pk_column)
}

// ============================================================================
// Constraint Naming
// ============================================================================

/// Generate a foreign key constraint name.
/// Format: `fk_{table}_{col1}_{col2}...`
pub fn build_foreign_key_name(table: &str, columns: &[String]) -> String {
    format!("fk_{}_{}", table, columns.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Table Naming Tests
    // ========================================================================

    #[test]
    fn test_pluralize_regular() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("tag"), "tags");
    }

    #[test]
    fn test_pluralize_consonant_y() {
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("inquiry"), "inquiries");
    }

    #[test]
    fn test_pluralize_vowel_y() {
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("toy"), "toys");
    }

    #[test]
    fn test_pluralize_sibilants() {
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("dish"), "dishes");
        assert_eq!(pluralize("quiz"), "quizes");
    }

    #[test]
    fn test_pluralize_consonant_z() {
        assert_eq!(pluralize("waltz"), "waltzzes");
    }

    #[test]
    fn test_pluralize_single_letter() {
        assert_eq!(pluralize("y"), "ys");
        assert_eq!(pluralize("a"), "as");
    }

    #[test]
    fn test_default_table_name() {
        assert_eq!(default_table_name("Post"), "posts");
        assert_eq!(default_table_name("Tag"), "tags");
        assert_eq!(default_table_name("Category"), "categories");
        assert_eq!(default_table_name("OrderLine"), "orderlines");
    }

    // ========================================================================
    // Index Naming Tests
    // ========================================================================

    #[test]
    fn test_build_index_name_single_field() {
        assert_eq!(
            build_index_name("users", &["email".into()], false),
            "ix_users_email"
        );
    }

    #[test]
    fn test_build_index_name_unique() {
        assert_eq!(
            build_index_name("users", &["email".into()], true),
            "uq_users_email"
        );
    }

    #[test]
    fn test_build_index_name_keeps_field_order() {
        assert_eq!(
            build_index_name("users", &["last_name".into(), "first_name".into()], false),
            "ix_users_last_name_first_name"
        );
    }

    // ========================================================================
    // Association Naming Tests
    // ========================================================================

    #[test]
    fn test_build_association_table_name_sorted() {
        assert_eq!(build_association_table_name("posts", "tags"), "posts_tags");
        assert_eq!(build_association_table_name("tags", "posts"), "posts_tags");
    }

    #[test]
    fn test_build_association_table_name_self_reference() {
        assert_eq!(build_association_table_name("users", "users"), "users_users");
    }

    #[test]
    fn test_build_association_column_name() {
        assert_eq!(build_association_column_name("posts", "id"), "posts_id");
        assert_eq!(build_association_column_name("tags", "tag_id"), "tags_tag_id");
    }

    // ========================================================================
    // Constraint Naming Tests
    // ========================================================================

    #[test]
    fn test_build_foreign_key_name() {
        assert_eq!(
            build_foreign_key_name("posts", &["user_id".into()]),
            "fk_posts_user_id"
        );
    }
}
