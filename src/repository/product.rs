use chrono::Utc;
use diesel::prelude::*;

use crate::domain::image::ImageSet;
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{CategoryName, PlaceName, ProductId, StoredPath};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
};
use crate::repository::image::{detail, display};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult,
};

impl ProductReader for DieselRepository {
    fn product_exists(
        &self,
        category: &CategoryName,
        place_name: &PlaceName,
    ) -> RepositoryResult<bool> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(
            products::table
                .filter(products::category.eq(category.as_str()))
                .filter(products::place_name.eq(place_name.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }

    fn get_product_by_id(&self, id: &ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .find(id.as_str())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(category) = &query.category {
            items = items.filter(products::category.eq(category.as_str()));
        }

        if let Some(region) = &query.region {
            items = items.filter(products::kab_kota.eq(region.as_str()));
        }

        let items = items
            .order((products::created_at.asc(), products::id.asc()))
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(
        &self,
        product: &NewProduct,
        images: &ImageSet,
    ) -> RepositoryResult<ProductId> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let id = ProductId::generate();
        let row = DbNewProduct::from_domain(&id, product, Utc::now().naive_utc());

        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::insert_into(products::table)
                .values(&row)
                .execute(conn)?;
            detail::insert(conn, &id, &images.detail)?;
            display::insert(conn, &id, &images.display)?;
            Ok(())
        })?;

        Ok(id)
    }

    fn update_product(
        &self,
        id: &ProductId,
        product: &NewProduct,
        images: &ImageSet,
    ) -> RepositoryResult<bool> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let changes = ProductChangeset::from_domain(product, Utc::now().naive_utc());

        let updated = conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(products::table.find(id.as_str()))
                .set(&changes)
                .execute(conn)?;
            if affected == 0 {
                return Ok(false);
            }
            detail::replace(conn, id, &images.detail)?;
            display::replace(conn, id, &images.display)?;
            Ok(true)
        })?;

        Ok(updated)
    }

    fn delete_product(&self, id: &ProductId) -> RepositoryResult<Option<Vec<StoredPath>>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let paths = conn.transaction::<_, RepositoryError, _>(|conn| {
            let mut paths = detail::stored_paths(conn, id)?;
            paths.extend(display::stored_paths(conn, id)?);

            detail::delete_all(conn, id)?;
            display::delete_all(conn, id)?;
            let affected = diesel::delete(products::table.find(id.as_str())).execute(conn)?;
            if affected == 0 {
                return Ok(None);
            }
            Ok(Some(paths))
        })?;

        let paths = paths
            .map(|paths| {
                paths
                    .into_iter()
                    .map(StoredPath::new)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok(paths)
    }
}
