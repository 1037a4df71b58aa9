use diesel::prelude::*;

use crate::domain::image::ProductImage;
use crate::domain::types::{ImageKind, ProductId};
use crate::repository::{DieselRepository, ImageReader, RepositoryResult};

/// Generates the row-level helpers for one image table. Both tables share a
/// shape but diesel needs distinct table types.
macro_rules! image_table {
    ($module:ident, $table:ident, $row:ident, $new_row:ident) => {
        pub(crate) mod $module {
            use std::collections::HashSet;

            use diesel::prelude::*;
            use diesel::sqlite::SqliteConnection;

            use crate::domain::image::{NewProductImage, ProductImage};
            use crate::domain::types::ProductId;
            use crate::models::product_image::{$new_row, $row};
            use crate::repository::RepositoryResult;
            use crate::schema::$table;

            pub(crate) fn list(
                conn: &mut SqliteConnection,
                product_id: &ProductId,
            ) -> RepositoryResult<Vec<ProductImage>> {
                let images = $table::table
                    .filter($table::product_id.eq(product_id.as_str()))
                    .order($table::id.asc())
                    .load::<$row>(conn)?
                    .into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<ProductImage>, _>>()?;
                Ok(images)
            }

            pub(crate) fn stored_paths(
                conn: &mut SqliteConnection,
                product_id: &ProductId,
            ) -> RepositoryResult<Vec<String>> {
                Ok($table::table
                    .filter($table::product_id.eq(product_id.as_str()))
                    .order($table::id.asc())
                    .select($table::filename_path)
                    .load::<String>(conn)?)
            }

            pub(crate) fn insert(
                conn: &mut SqliteConnection,
                product_id: &ProductId,
                images: &[NewProductImage],
            ) -> RepositoryResult<usize> {
                if images.is_empty() {
                    return Ok(0);
                }
                let rows = images
                    .iter()
                    .map(|image| $new_row {
                        product_id: product_id.as_str().to_string(),
                        filename: image.filename.as_str().to_string(),
                        filename_path: image.stored_path.as_str().to_string(),
                    })
                    .collect::<Vec<_>>();
                Ok(diesel::insert_into($table::table)
                    .values(&rows)
                    .execute(conn)?)
            }

            /// Make the stored collection equal to `images`, keeping rows whose
            /// path survives.
            pub(crate) fn replace(
                conn: &mut SqliteConnection,
                product_id: &ProductId,
                images: &[NewProductImage],
            ) -> RepositoryResult<()> {
                let wanted = images
                    .iter()
                    .map(|image| image.stored_path.as_str().to_string())
                    .collect::<Vec<_>>();

                diesel::delete(
                    $table::table
                        .filter($table::product_id.eq(product_id.as_str()))
                        .filter($table::filename_path.ne_all(wanted)),
                )
                .execute(conn)?;

                let existing = stored_paths(conn, product_id)?
                    .into_iter()
                    .collect::<HashSet<_>>();
                let added = images
                    .iter()
                    .filter(|image| !existing.contains(image.stored_path.as_str()))
                    .cloned()
                    .collect::<Vec<_>>();
                insert(conn, product_id, &added)?;
                Ok(())
            }

            pub(crate) fn delete_all(
                conn: &mut SqliteConnection,
                product_id: &ProductId,
            ) -> RepositoryResult<usize> {
                Ok(diesel::delete(
                    $table::table.filter($table::product_id.eq(product_id.as_str())),
                )
                .execute(conn)?)
            }
        }
    };
}

image_table!(detail, detail_images, DetailImage, NewDetailImage);
image_table!(display, display_images, DisplayImage, NewDisplayImage);

impl ImageReader for DieselRepository {
    fn list_images(
        &self,
        product_id: &ProductId,
        kind: ImageKind,
    ) -> RepositoryResult<Vec<ProductImage>> {
        let mut conn = self.conn()?;
        match kind {
            ImageKind::Detail => detail::list(&mut conn, product_id),
            ImageKind::Display => display::list(&mut conn, product_id),
        }
    }
}
