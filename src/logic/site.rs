//! Advertisement banners and site settings.

use crate::models::{Advertisement, NewAdvertisement, Settings, SettingsUpdate, TournamentError};
use crate::store::{
    fetch_all, fetch_one, insert_one, update_where, Collection, Filter, Query, Store,
};
use uuid::Uuid;

/// Banners ordered by `display_order`.
pub async fn list_advertisements(
    store: &dyn Store,
    active_only: bool,
) -> Result<Vec<Advertisement>, TournamentError> {
    let mut query = Query::new();
    if active_only {
        query = query.eq("is_active", true);
    }
    Ok(fetch_all(store, Collection::Advertisements, &query.order_by("display_order", true)).await?)
}

/// Add an active banner at the end of the display order.
pub async fn add_advertisement(
    store: &dyn Store,
    form: NewAdvertisement,
) -> Result<Advertisement, TournamentError> {
    if form.title.trim().is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let count = list_advertisements(store, false).await?.len();
    let ad = Advertisement {
        id: Uuid::new_v4(),
        title: form.title.trim().to_string(),
        image_url: form.image_url.filter(|s| !s.trim().is_empty()),
        link: form.link.filter(|s| !s.trim().is_empty()),
        is_active: true,
        display_order: count as u32,
    };
    Ok(insert_one(store, Collection::Advertisements, &ad).await?)
}

pub async fn delete_advertisement(store: &dyn Store, id: Uuid) -> Result<(), TournamentError> {
    let removed = store
        .delete(Collection::Advertisements, &[Filter::eq("id", id.to_string())])
        .await?;
    if removed == 0 {
        return Err(TournamentError::AdvertisementNotFound(id));
    }
    Ok(())
}

/// The settings record, created with defaults on first access.
pub async fn load_settings(store: &dyn Store) -> Result<Settings, TournamentError> {
    let existing: Option<Settings> = fetch_one(store, Collection::Settings, Query::new()).await?;
    match existing {
        Some(settings) => Ok(settings),
        None => {
            log::info!("No settings record found, creating defaults");
            Ok(insert_one(store, Collection::Settings, &Settings::default()).await?)
        }
    }
}

/// Apply the fields present in `update` to the settings record.
pub async fn save_settings(
    store: &dyn Store,
    update: SettingsUpdate,
) -> Result<Settings, TournamentError> {
    let current = load_settings(store).await?;
    let updated: Vec<Settings> = update_where(
        store,
        Collection::Settings,
        &[Filter::eq("id", current.id.to_string())],
        &update,
    )
    .await?;
    Ok(updated.into_iter().next().unwrap_or(current))
}
