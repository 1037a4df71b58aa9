//! Read-side product queries.
//!
//! The repository only filters by exact category/region. Distance, radius
//! filtering, ranking and truncation all happen here, after which each
//! surviving product is enriched with its resolved image collections.

use std::cmp::Ordering;

use log::error;

use crate::domain::product::Product;
use crate::domain::types::{
    CategoryName, Coordinate, ImageKind, ProductId, RegionName, ResultLimit, SearchRadiusKm,
    SortBy,
};
use crate::geo::{TravelEstimate, TravelPolicy, distance_and_eta};
use crate::repository::{ImageReader, ProductListQuery, ProductReader};
use crate::services::images::{ImageUrlResolver, ResolvedImage, resolve_images};

use super::errors::{ServiceError, ServiceResult};

/// A product with its images and, when a reference point was supplied, the
/// distance from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub product: Product,
    pub detail_images: Vec<ResolvedImage>,
    pub display_images: Vec<ResolvedImage>,
    pub travel: Option<TravelEstimate>,
}

/// Arguments of the category listing.
#[derive(Debug, Clone)]
pub struct CategorySearch {
    pub category: CategoryName,
    pub origin: Coordinate,
    /// Unknown sort keys are parsed to `None` and keep repository order.
    pub sort_by: Option<SortBy>,
    pub region: Option<RegionName>,
}

/// Arguments of the top-rated listing.
#[derive(Debug, Clone)]
pub struct TopRatedSearch {
    pub origin: Coordinate,
    pub category: Option<CategoryName>,
    pub limit: ResultLimit,
}

/// Executes the product query shapes against a repository.
pub struct QueryEngine<'a, R> {
    repo: &'a R,
    resolver: &'a ImageUrlResolver,
    policy: TravelPolicy,
}

type Annotated = (Product, TravelEstimate);

impl<'a, R> QueryEngine<'a, R>
where
    R: ProductReader + ImageReader,
{
    pub fn new(repo: &'a R, resolver: &'a ImageUrlResolver, policy: TravelPolicy) -> Self {
        Self {
            repo,
            resolver,
            policy,
        }
    }

    /// Every product in repository order, without distance.
    pub fn all(&self) -> ServiceResult<Vec<ProductListing>> {
        let products = self.load(ProductListQuery::default())?;
        products
            .into_iter()
            .map(|product| self.enrich(product, None))
            .collect()
    }

    /// A single product, without distance.
    pub fn get(&self, id: &ProductId) -> ServiceResult<Option<ProductListing>> {
        let product = match self.repo.get_product_by_id(id) {
            Ok(product) => product,
            Err(e) => {
                error!("Failed to get product {id}: {e}");
                return Err(ServiceError::Internal);
            }
        };
        product.map(|product| self.enrich(product, None)).transpose()
    }

    /// Products in `region`, annotated with distance from `origin`, in
    /// repository order.
    pub fn by_region(
        &self,
        region: RegionName,
        origin: Coordinate,
    ) -> ServiceResult<Vec<ProductListing>> {
        let products = self.load(ProductListQuery::default().region(region))?;
        self.finish(self.annotate(products, origin))
    }

    /// Products in a category, optionally narrowed to a region and ordered
    /// by `sort_by`.
    pub fn by_category(&self, search: CategorySearch) -> ServiceResult<Vec<ProductListing>> {
        let mut query = ProductListQuery::default().category(search.category);
        if let Some(region) = search.region {
            query = query.region(region);
        }
        let products = self.load(query)?;
        let mut rows = self.annotate(products, search.origin);

        if let Some(sort_by) = search.sort_by {
            rows.sort_by(|a, b| compare(sort_by, a, b));
        }

        self.finish(rows)
    }

    /// Products within `radius` of `origin`, nearest first. An empty result
    /// means nothing is in range.
    pub fn nearby(
        &self,
        origin: Coordinate,
        radius: SearchRadiusKm,
    ) -> ServiceResult<Vec<ProductListing>> {
        let products = self.load(ProductListQuery::default())?;
        let mut rows = self.annotate(products, origin);
        rows.retain(|(_, travel)| travel.distance_km <= radius.get());
        rows.sort_by(|a, b| compare(SortBy::Distance, a, b));
        self.finish(rows)
    }

    /// Highest rated products first, ties broken by distance, truncated to
    /// `limit`.
    pub fn top_rated(&self, search: TopRatedSearch) -> ServiceResult<Vec<ProductListing>> {
        let query = match search.category {
            Some(category) => ProductListQuery::default().category(category),
            None => ProductListQuery::default(),
        };
        let products = self.load(query)?;
        let mut rows = self.annotate(products, search.origin);
        rows.sort_by(|a, b| {
            compare(SortBy::Rating, a, b).then_with(|| compare(SortBy::Distance, a, b))
        });
        rows.truncate(search.limit.get());
        self.finish(rows)
    }

    fn load(&self, query: ProductListQuery) -> ServiceResult<Vec<Product>> {
        match self.repo.list_products(query) {
            Ok(products) => Ok(products),
            Err(e) => {
                error!("Failed to list products: {e}");
                Err(ServiceError::Internal)
            }
        }
    }

    fn annotate(&self, products: Vec<Product>, origin: Coordinate) -> Vec<Annotated> {
        products
            .into_iter()
            .map(|product| {
                let travel = distance_and_eta(origin, product.coordinate, self.policy);
                (product, travel)
            })
            .collect()
    }

    fn finish(&self, rows: Vec<Annotated>) -> ServiceResult<Vec<ProductListing>> {
        rows.into_iter()
            .map(|(product, travel)| self.enrich(product, Some(travel)))
            .collect()
    }

    fn enrich(
        &self,
        product: Product,
        travel: Option<TravelEstimate>,
    ) -> ServiceResult<ProductListing> {
        let detail_images = self.images(&product.id, ImageKind::Detail)?;
        let display_images = self.images(&product.id, ImageKind::Display)?;
        Ok(ProductListing {
            product,
            detail_images,
            display_images,
            travel,
        })
    }

    fn images(&self, id: &ProductId, kind: ImageKind) -> ServiceResult<Vec<ResolvedImage>> {
        match self.repo.list_images(id, kind) {
            Ok(images) => Ok(resolve_images(images, self.resolver)),
            Err(e) => {
                error!("Failed to list {kind} images for product {id}: {e}");
                Err(ServiceError::Internal)
            }
        }
    }
}

fn compare(sort_by: SortBy, (a, ta): &Annotated, (b, tb): &Annotated) -> Ordering {
    match sort_by {
        SortBy::Distance => ta.distance_km.total_cmp(&tb.distance_km),
        SortBy::Price => a.price.get().total_cmp(&b.price.get()),
        SortBy::Rating => b.rating.get().total_cmp(&a.rating.get()),
        SortBy::Availability => b.stock.get().cmp(&a.stock.get()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::ProductImage;
    use crate::domain::types::{
        FileName, ImageId, LocationLabel, PlaceName, ProductDescription, ProductPrice,
        ProductRating, ProductStock, StoredPath, UserId,
    };
    use crate::repository::test::TestRepository;
    use chrono::{NaiveDate, NaiveTime};

    fn product(id: &str, category: &str, region: &str, lat: f64, rating: f64, price: f64, stock: i32) -> Product {
        let ts = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Product {
            id: ProductId::new(id).unwrap(),
            user_id: UserId::new(1).unwrap(),
            category: CategoryName::new(category).unwrap(),
            place_name: PlaceName::new(format!("Place {id}")).unwrap(),
            rating: ProductRating::new(rating).unwrap(),
            price: ProductPrice::new(price).unwrap(),
            stock: ProductStock::new(stock).unwrap(),
            description: ProductDescription::new("desc").unwrap(),
            open_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            location: LocationLabel::new("somewhere").unwrap(),
            coordinate: Coordinate::from_degrees(lat, 0.0).unwrap(),
            region: RegionName::new(region).unwrap(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn origin() -> Coordinate {
        Coordinate::from_degrees(0.0, 0.0).unwrap()
    }

    fn resolver() -> ImageUrlResolver {
        ImageUrlResolver::new("app/asset", "http://h/")
    }

    fn ids(listings: &[ProductListing]) -> Vec<&str> {
        listings.iter().map(|l| l.product.id.as_str()).collect()
    }

    fn sample_repo() -> TestRepository {
        TestRepository::new(
            vec![
                product("a", "pantai", "Medan", 0.5, 4.0, 20.0, 5),
                product("b", "pantai", "Karo", 0.1, 5.0, 50.0, 1),
                product("c", "gunung", "Karo", 0.0, 3.0, 10.0, 9),
                product("d", "pantai", "Karo", 0.3, 3.5, 5.0, 3),
            ],
            vec![],
        )
    }

    #[test]
    fn all_keeps_repository_order_without_distance() {
        let repo = sample_repo();
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let result = engine.all().unwrap();
        assert_eq!(ids(&result), vec!["a", "b", "c", "d"]);
        assert!(result.iter().all(|l| l.travel.is_none()));
    }

    #[test]
    fn by_region_filters_exactly_and_annotates() {
        let repo = sample_repo();
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let result = engine
            .by_region(RegionName::new("Karo").unwrap(), origin())
            .unwrap();
        assert_eq!(ids(&result), vec!["b", "c", "d"]);
        assert!(result.iter().all(|l| l.travel.is_some()));

        let none = engine
            .by_region(RegionName::new("karo").unwrap(), origin())
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn by_category_sorts_by_requested_key() {
        let repo = sample_repo();
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let search = |sort_by| CategorySearch {
            category: CategoryName::new("pantai").unwrap(),
            origin: origin(),
            sort_by,
            region: None,
        };

        let by_rating = engine.by_category(search(Some(SortBy::Rating))).unwrap();
        let ratings: Vec<f64> = by_rating.iter().map(|l| l.product.rating.get()).collect();
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]));

        let by_price = engine.by_category(search(Some(SortBy::Price))).unwrap();
        let prices: Vec<f64> = by_price.iter().map(|l| l.product.price.get()).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));

        let by_distance = engine.by_category(search(Some(SortBy::Distance))).unwrap();
        assert_eq!(ids(&by_distance), vec!["b", "d", "a"]);

        let by_stock = engine.by_category(search(Some(SortBy::Availability))).unwrap();
        assert_eq!(ids(&by_stock), vec!["a", "d", "b"]);
    }

    #[test]
    fn unknown_sort_key_behaves_like_no_sort() {
        let repo = sample_repo();
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let search = |sort_by| CategorySearch {
            category: CategoryName::new("pantai").unwrap(),
            origin: origin(),
            sort_by,
            region: None,
        };
        let bogus = engine.by_category(search(SortBy::parse("bogus"))).unwrap();
        let unsorted = engine.by_category(search(None)).unwrap();
        assert_eq!(bogus, unsorted);
        assert_eq!(ids(&unsorted), vec!["a", "b", "d"]);
    }

    #[test]
    fn by_category_applies_region_filter() {
        let repo = sample_repo();
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let result = engine
            .by_category(CategorySearch {
                category: CategoryName::new("pantai").unwrap(),
                origin: origin(),
                sort_by: None,
                region: Some(RegionName::new("Karo").unwrap()),
            })
            .unwrap();
        assert_eq!(ids(&result), vec!["b", "d"]);
    }

    #[test]
    fn nearby_returns_only_products_in_radius() {
        let repo = TestRepository::new(
            vec![
                product("near", "pantai", "Medan", 0.0, 4.0, 1.0, 1),
                product("far", "pantai", "Medan", 1.0, 4.0, 1.0, 1),
            ],
            vec![],
        );
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let result = engine
            .nearby(origin(), SearchRadiusKm::new(5.0).unwrap())
            .unwrap();
        assert_eq!(ids(&result), vec!["near"]);
        assert_eq!(result[0].travel.unwrap().distance_km, 0.0);
    }

    #[test]
    fn nearby_is_monotonic_in_radius() {
        let repo = sample_repo();
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let mut previous = 0;
        for radius in [1.0, 12.0, 40.0, 60.0, 1000.0] {
            let result = engine
                .nearby(origin(), SearchRadiusKm::new(radius).unwrap())
                .unwrap();
            assert!(result.len() >= previous);
            assert!(
                result
                    .iter()
                    .all(|l| l.travel.unwrap().distance_km <= radius)
            );
            previous = result.len();
        }
        assert_eq!(previous, 4);
    }

    #[test]
    fn top_rated_orders_by_rating_and_truncates() {
        let repo = TestRepository::new(
            vec![
                product("three", "pantai", "Medan", 0.0, 3.0, 1.0, 1),
                product("five", "pantai", "Medan", 2.0, 5.0, 1.0, 1),
                product("four", "pantai", "Medan", 1.0, 4.0, 1.0, 1),
            ],
            vec![],
        );
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let result = engine
            .top_rated(TopRatedSearch {
                origin: origin(),
                category: None,
                limit: ResultLimit::new(2).unwrap(),
            })
            .unwrap();
        assert_eq!(ids(&result), vec!["five", "four"]);
    }

    #[test]
    fn top_rated_breaks_ties_by_distance() {
        let repo = TestRepository::new(
            vec![
                product("far", "pantai", "Medan", 2.0, 5.0, 1.0, 1),
                product("near", "pantai", "Medan", 0.5, 5.0, 1.0, 1),
                product("other", "gunung", "Medan", 0.0, 5.0, 1.0, 1),
            ],
            vec![],
        );
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let result = engine
            .top_rated(TopRatedSearch {
                origin: origin(),
                category: Some(CategoryName::new("pantai").unwrap()),
                limit: ResultLimit::default(),
            })
            .unwrap();
        assert_eq!(ids(&result), vec!["near", "far"]);
    }

    #[test]
    fn listings_carry_resolved_images_per_collection() {
        let p = product("a", "pantai", "Medan", 0.0, 4.0, 1.0, 1);
        let image = |id, kind: ImageKind, name: &str| ProductImage {
            id: ImageId::new(id).unwrap(),
            product_id: p.id.clone(),
            kind,
            filename: FileName::new(name).unwrap(),
            stored_path: StoredPath::new(format!("app/asset/{}/{name}", kind.folder())).unwrap(),
        };
        let repo = TestRepository::new(
            vec![p.clone()],
            vec![
                image(1, ImageKind::Detail, "d.jpg"),
                image(2, ImageKind::Display, "s.jpg"),
            ],
        );
        let r = resolver();
        let engine = QueryEngine::new(&repo, &r, TravelPolicy::default());
        let listing = engine.get(&p.id).unwrap().unwrap();
        assert_eq!(listing.detail_images.len(), 1);
        assert_eq!(
            listing.detail_images[0].public_url,
            "http://h/static/detail_image/d.jpg"
        );
        assert_eq!(
            listing.display_images[0].public_url,
            "http://h/static/display_image/s.jpg"
        );
        assert!(engine.get(&ProductId::new("missing").unwrap()).unwrap().is_none());
    }
}
