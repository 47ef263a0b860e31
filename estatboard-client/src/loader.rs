//! Fetch, decode, aggregate and publish in one call per dashboard view.

use estatboard::aggregations::{
    decode_activity, decode_domains, domain_shares, ActivityGrid, DomainShare, RoomTable,
};
use estatboard::config::AggregationConfig;
use estatboard::{
    CategoryDimension, DashboardSession, RealEstateKind, RecordDecoder, RequestTicket, ViewKey,
};

use crate::error::{ClientError, Result};
use crate::query::StatsQuery;
use crate::sources::StatsSource;

/// A freshly computed view and whether it reached the session.
///
/// `published` is false when a newer request for the same view was started
/// while this one was in flight.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub published: bool,
}

pub async fn load_room_table<S>(
    source: &S,
    session: &DashboardSession,
    kind: RealEstateKind,
    dimension: CategoryDimension,
    query: &StatsQuery,
    settings: &AggregationConfig,
) -> Result<Loaded<RoomTable>>
where
    S: StatsSource + ?Sized,
{
    let ticket = session.begin(ViewKey::Rooms { kind, dimension });

    let result = async {
        let options = settings.options();
        options.validate()?;

        let rows = source.fetch_room_counts(kind, dimension, query).await?;
        let records = RecordDecoder::new(dimension)
            .missing_count(settings.missing_count)
            .decode(&rows)?;
        Ok::<_, ClientError>(RoomTable::build(&records, kind, dimension, &options)?)
    }
    .await;

    let table = report(source, &ticket, result)?;
    let published = session.publish_rooms(ticket, table.clone());
    Ok(Loaded {
        value: table,
        published,
    })
}

pub async fn load_activity<S>(
    source: &S,
    session: &DashboardSession,
    kind: RealEstateKind,
    query: &StatsQuery,
    settings: &AggregationConfig,
) -> Result<Loaded<ActivityGrid>>
where
    S: StatsSource + ?Sized,
{
    let ticket = session.begin(ViewKey::Activity { kind });

    let result = async {
        let rows = source.fetch_activity(kind, query).await?;
        let records = decode_activity(&rows, settings.missing_count)?;
        Ok::<_, ClientError>(ActivityGrid::from_records(&records)?)
    }
    .await;

    let grid = report(source, &ticket, result)?;
    let published = session.publish_activity(ticket, kind, grid.clone());
    Ok(Loaded {
        value: grid,
        published,
    })
}

pub async fn load_domains<S>(
    source: &S,
    session: &DashboardSession,
    query: &StatsQuery,
    settings: &AggregationConfig,
) -> Result<Loaded<Vec<DomainShare>>>
where
    S: StatsSource + ?Sized,
{
    let ticket = session.begin(ViewKey::Domains);

    let result = async {
        let rows = source.fetch_domains(query).await?;
        let records = decode_domains(&rows, settings.missing_count)?;
        Ok::<_, ClientError>(domain_shares(&records)?)
    }
    .await;

    let shares = report(source, &ticket, result)?;
    let published = session.publish_domains(ticket, shares.clone());
    Ok(Loaded {
        value: shares,
        published,
    })
}

fn report<S, T>(source: &S, ticket: &RequestTicket, result: Result<T>) -> Result<T>
where
    S: StatsSource + ?Sized,
{
    if let Err(e) = &result {
        tracing::error!(
            source = source.source_name(),
            view = %ticket.view(),
            "Failed to load statistics: {}",
            e
        );
    }
    result
}
