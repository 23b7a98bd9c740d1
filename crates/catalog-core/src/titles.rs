use crate::models::ProductType;
use crate::traits::TitleResolver;

/// The attribute bag a [`TitleResolver`] works from, one shape per product family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleAttributes<'a> {
    Book {
        book_title: &'a str,
        kind: Option<&'a str>,
        author: &'a str,
    },
    /// DVDs and blu-rays.
    Film {
        product_type: ProductType,
        title: &'a str,
        kind: Option<&'a str>,
        director: &'a str,
        year: Option<i32>,
    },
    VinylRecord {
        album_name: &'a str,
        artist_name: &'a str,
    },
}

impl TitleAttributes<'_> {
    pub fn product_type(&self) -> ProductType {
        match self {
            TitleAttributes::Book { .. } => ProductType::Book,
            TitleAttributes::Film { product_type, .. } => *product_type,
            TitleAttributes::VinylRecord { .. } => ProductType::VinylRecord,
        }
    }
}

/// Display title and subtitle for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Titles {
    pub title: String,
    pub subtitle: String,
}

/// Default display rules: the creator goes in the subtitle, films get their year.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardTitleResolver;

impl TitleResolver for StandardTitleResolver {
    fn resolve(&self, attributes: &TitleAttributes<'_>) -> Titles {
        match *attributes {
            TitleAttributes::Book {
                book_title, author, ..
            } => Titles {
                title: book_title.to_string(),
                subtitle: author.to_string(),
            },
            TitleAttributes::Film {
                title,
                director,
                year,
                ..
            } => Titles {
                title: match year {
                    Some(year) => format!("{title} ({year})"),
                    None => title.to_string(),
                },
                subtitle: director.to_string(),
            },
            TitleAttributes::VinylRecord {
                album_name,
                artist_name,
            } => Titles {
                title: album_name.to_string(),
                subtitle: artist_name.to_string(),
            },
        }
    }
}
