use crate::error::AppError;
use crate::models::{NormalizedProduct, RawCatalogItem};
use crate::release_date::release_year;
use crate::titles::TitleAttributes;
use crate::traits::TitleResolver;

/// Build the resolver attribute bag for one raw record.
fn title_attributes(item: &RawCatalogItem) -> Result<TitleAttributes<'_>, AppError> {
    let attributes = match item {
        RawCatalogItem::Book(book) => TitleAttributes::Book {
            book_title: &book.title,
            kind: item.genre(),
            author: &book.author,
        },
        RawCatalogItem::Dvd(film) | RawCatalogItem::BluRay(film) => TitleAttributes::Film {
            product_type: item.product_type(),
            title: &film.title,
            kind: item.genre(),
            director: &film.director,
            year: release_year(film.release_date.as_deref()).map_err(|e| match e {
                AppError::MalformedRecord(reason) => AppError::MalformedRecord(format!(
                    "{} {}: {reason}",
                    item.product_type(),
                    film.id
                )),
                other => other,
            })?,
        },
        RawCatalogItem::VinylRecord(vinyl) => TitleAttributes::VinylRecord {
            album_name: &vinyl.album_name,
            artist_name: &vinyl.artist_name,
        },
    };
    Ok(attributes)
}

/// Convert one raw catalog record into its canonical product shape.
///
/// `kind` is set exactly when the record carries a non-empty genre; price and
/// quantity stay empty until the stock merge.
pub fn normalize<R: TitleResolver>(
    resolver: &R,
    item: &RawCatalogItem,
) -> Result<NormalizedProduct, AppError> {
    let titles = resolver.resolve(&title_attributes(item)?);

    Ok(NormalizedProduct {
        id: item.id().to_string(),
        product_type: item.product_type(),
        title: titles.title,
        subtitle: titles.subtitle,
        kind: item.genre().map(str::to_string),
        price: None,
        quantity: None,
    })
}

/// Normalize a sequence of records, preserving order. The first failure aborts.
pub fn normalize_all<'a, R, I>(resolver: &R, items: I) -> Result<Vec<NormalizedProduct>, AppError>
where
    R: TitleResolver,
    I: IntoIterator<Item = &'a RawCatalogItem>,
{
    items
        .into_iter()
        .map(|item| normalize(resolver, item))
        .collect()
}
