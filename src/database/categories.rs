//! Lookup and tree checks shared by the archive and knowledge category tables.
//!
//! Both tables have the same `id` / `parent_id` shape, so the helpers are
//! generated per table instead of being written twice.

macro_rules! category_tree {
    ($table:ident, $model:ty, $label:literal) => {
        fn find_category(
            conn: &mut diesel::sqlite::SqliteConnection,
            category_id: i32,
        ) -> Result<$model, $crate::error::ApiError> {
            $table::table
                .find(category_id)
                .first::<$model>(conn)
                .optional()?
                .ok_or_else(|| $crate::error::ApiError::NotFound(concat!($label, " not found").to_string()))
        }

        fn category_exists(
            conn: &mut diesel::sqlite::SqliteConnection,
            category_id: i32,
        ) -> Result<bool, $crate::error::ApiError> {
            Ok($table::table
                .find(category_id)
                .select($table::id)
                .first::<i32>(conn)
                .optional()?
                .is_some())
        }

        /// Checks a category referenced by a record placed in it.
        fn ensure_category(
            conn: &mut diesel::sqlite::SqliteConnection,
            category_id: i32,
        ) -> Result<(), $crate::error::ApiError> {
            if category_exists(conn, category_id)? {
                Ok(())
            } else {
                Err($crate::error::ApiError::NotFound(concat!($label, " not found").to_string()))
            }
        }

        fn ensure_parent(
            conn: &mut diesel::sqlite::SqliteConnection,
            parent_id: i32,
        ) -> Result<(), $crate::error::ApiError> {
            if category_exists(conn, parent_id)? {
                Ok(())
            } else {
                Err($crate::error::ApiError::NotFound("Parent category not found".to_string()))
            }
        }

        /// Rejects a parent assignment that would put `category_id` under itself.
        fn ensure_no_cycle(
            conn: &mut diesel::sqlite::SqliteConnection,
            category_id: i32,
            new_parent_id: i32,
        ) -> Result<(), $crate::error::ApiError> {
            let mut cursor = Some(new_parent_id);
            while let Some(current) = cursor {
                if current == category_id {
                    return Err($crate::error::ApiError::Conflict(
                        "Category cannot be moved under itself or its descendants".to_string(),
                    ));
                }
                cursor = $table::table
                    .find(current)
                    .select($table::parent_id)
                    .first::<Option<i32>>(conn)
                    .optional()?
                    .flatten();
            }
            Ok(())
        }
    };
}

pub(crate) use category_tree;
