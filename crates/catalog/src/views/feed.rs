//! Home screen feed.

use crate::entities::Meal;

/// Number of regular meals the home screen shows.
pub const DEFAULT_REGULAR_LIMIT: usize = 6;

/// Split meals into express and regular, each in catalog order.
pub fn partition_express<'a, I>(meals: I) -> (Vec<&'a Meal>, Vec<&'a Meal>)
where
    I: IntoIterator<Item = &'a Meal>,
{
    meals.into_iter().partition(|meal| meal.is_express)
}

/// What the home screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeFeed<'a> {
    pub express: Vec<&'a Meal>,
    /// First `limit` regular meals, unsorted.
    pub regular: Vec<&'a Meal>,
}

pub fn home_feed<'a, I>(meals: I, regular_limit: usize) -> HomeFeed<'a>
where
    I: IntoIterator<Item = &'a Meal>,
{
    let (express, mut regular) = partition_express(meals);
    regular.truncate(regular_limit);
    HomeFeed { express, regular }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    #[test]
    fn test_bundled_feed() {
        let catalog = Catalog::bundled().unwrap();
        let feed = home_feed(&catalog, DEFAULT_REGULAR_LIMIT);

        assert_eq!(feed.express.len(), 3);
        assert_eq!(feed.regular.len(), 6);
        assert_eq!(feed.regular[0].id, "4");
        assert!(feed.regular.iter().all(|meal| !meal.is_express));
    }

    #[test]
    fn test_empty_catalog_feed() {
        let catalog = Catalog::empty();
        let feed = home_feed(&catalog, DEFAULT_REGULAR_LIMIT);
        assert!(feed.express.is_empty());
        assert!(feed.regular.is_empty());
    }
}
