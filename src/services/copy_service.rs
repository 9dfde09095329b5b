use bson::{oid::ObjectId, DateTime};

use crate::{
    db::Store,
    error::ApiError,
    middleware::auth_context::Session,
    models::trip::TripView,
};

/// Copies a trip into the caller's collection as a new private trip that
/// remembers where it came from. The source is not modified.
pub async fn save_trip<S: Store>(
    store: &S,
    session: &Session,
    source_id: &ObjectId,
) -> Result<TripView, ApiError> {
    let source = store
        .find_trip(source_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Trip not found"))?;

    let mut copy = source.saved_copy(*source_id, session.user_id, DateTime::now());
    let id = store.insert_trip(&copy).await?;
    copy.id = Some(id);

    log::info!(
        "User {} saved trip {} as {}",
        session.user_id,
        source_id,
        id
    );
    Ok(TripView::new(copy, Some(&session.user_id)))
}
