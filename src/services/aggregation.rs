// src/services/aggregation.rs
//
// Cálculo das médias a partir de soma e contagem cruas.
// Arredondamento: 2 casas, metade para cima (4.345 -> 4.35).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    rating::{AverageRating, RatingStats},
    store::{StoreRatingRow, StoreWithRating},
};

pub fn average_rating(stats: RatingStats) -> AverageRating {
    AverageRating {
        average_rating: rounded_mean(stats.sum, stats.count),
        rating_count: stats.count,
    }
}

/// Média ponderada de um dono: Σ soma / Σ contagem de todas as lojas.
/// Equivale a Σ(média × contagem) / Σ contagem sem acumular erro de arredondamento.
pub fn owner_rollup<'a, I>(stores: I) -> AverageRating
where
    I: IntoIterator<Item = &'a RatingStats>,
{
    let total = stores
        .into_iter()
        .fold(RatingStats::default(), |acc, s| RatingStats {
            sum: acc.sum + s.sum,
            count: acc.count + s.count,
        });

    average_rating(total)
}

pub fn store_with_rating(row: StoreRatingRow) -> StoreWithRating {
    let average = average_rating(row.stats());
    StoreWithRating {
        store: row.into_store(),
        average_rating: average.average_rating,
        rating_count: average.rating_count,
    }
}

fn rounded_mean(sum: i64, count: i64) -> Decimal {
    if count <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(sum) / Decimal::from(count))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
