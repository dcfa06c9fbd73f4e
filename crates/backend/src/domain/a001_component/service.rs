use contracts::domain::a001_component::{
    apply_filter, Component, ComponentDto, ComponentId, ComponentSort, DisplayedComponents,
};
use contracts::shared::list_utils::sort_list;

use crate::shared::data::RecordStore;
use crate::shared::error::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// All components, sorted by name in natural order
pub async fn list_all(store: &dyn RecordStore) -> Result<Vec<Component>, AppError> {
    let mut items = store.list_components().await?;
    let sort = ComponentSort::default();
    sort_list(&mut items, sort.field, sort.direction);
    Ok(items)
}

/// Loads the list and runs it through search and sort
pub async fn list_displayed(
    store: &dyn RecordStore,
    search_term: &str,
    sort: ComponentSort,
) -> Result<DisplayedComponents, AppError> {
    let items = store.list_components().await?;
    Ok(apply_filter(&items, search_term, sort))
}

pub async fn get_by_id(store: &dyn RecordStore, id: ComponentId) -> Result<Component, AppError> {
    Ok(store.get_component(id).await?)
}

pub async fn create(store: &dyn RecordStore, dto: ComponentDto) -> Result<Component, AppError> {
    dto.validate().map_err(AppError::Validation)?;
    let component = store.create_component(&dto.normalized()).await?;
    tracing::info!("Component {} created: {}", component.id, component.name);
    Ok(component)
}

pub async fn update(
    store: &dyn RecordStore,
    id: ComponentId,
    dto: ComponentDto,
) -> Result<(), AppError> {
    dto.validate().map_err(AppError::Validation)?;
    store.update_component(id, &dto.normalized()).await?;
    tracing::info!("Component {} updated", id);
    Ok(())
}

/// Deletes the readings of the component, then the component.
///
/// A failure of the first step stops before the component is touched.
/// Nothing is rolled back if the second step fails.
pub async fn delete(store: &dyn RecordStore, id: ComponentId) -> Result<(), AppError> {
    store.delete_readings_for_component(id).await.map_err(|e| {
        tracing::error!("Error deleting readings of component {}: {}", id, e);
        e
    })?;
    store.delete_component(id).await.map_err(|e| {
        tracing::error!("Error deleting component {}: {}", id, e);
        e
    })?;
    tracing::info!("Component {} and all its readings deleted", id);
    Ok(())
}

/// Stored object name for a drawing upload
pub fn drawing_file_name(id: ComponentId, timestamp_millis: i64) -> String {
    format!("component_{}_{}.pdf", id, timestamp_millis)
}

/// Uploads a PDF drawing and links it to the component.
///
/// Steps: upload file, resolve its public URL, save the URL on the component.
/// Returns the refreshed component.
pub async fn attach_drawing(
    store: &dyn RecordStore,
    id: ComponentId,
    bytes: Vec<u8>,
) -> Result<Component, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Please select a PDF file".into()));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("The uploaded file is not a PDF".into()));
    }

    let file_name = drawing_file_name(id, chrono::Utc::now().timestamp_millis());
    store.upload_file(&file_name, bytes).await?;

    let url = store.public_url(&file_name);
    store.update_component_drawing_url(id, &url).await?;
    tracing::info!("Drawing {} attached to component {}", file_name, id);

    Ok(store.get_component(id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support::RecordingStore;
    use crate::shared::data::StoreError;
    use chrono::NaiveDate;
    use contracts::domain::a002_reading::ReadingDto;

    fn dto(drawing: &str, name: &str, unit: &str) -> ComponentDto {
        ComponentDto {
            drawing: drawing.into(),
            name: name.into(),
            unit: unit.into(),
        }
    }

    async fn seed_reading(store: &RecordingStore, component_id: ComponentId) {
        store
            .inner
            .create_reading(&ReadingDto {
                component_id,
                test_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                inspector: "Inspector".into(),
                reading_value: 1.0,
                notes: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_name() {
        let store = RecordingStore::new();
        for name in ["LDAR-10", "LDAR-2", "LDAR-1"] {
            store.seed_component("D", name, "U").await;
        }
        let names: Vec<String> = list_all(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["LDAR-1", "LDAR-2", "LDAR-10"]);
    }

    #[tokio::test]
    async fn test_list_displayed_filters() {
        let store = RecordingStore::new();
        store.seed_component("D1", "V-102", "U1").await;
        store.seed_component("D2", "P-200", "U1").await;
        store.seed_component("D3", "V-101", "U1").await;

        let list = list_displayed(&store, "V-1", ComponentSort::default())
            .await
            .unwrap();
        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["V-101", "V-102"]);
        assert_eq!(list.total, 3);
    }

    #[tokio::test]
    async fn test_create_validates_and_trims() {
        let store = RecordingStore::new();
        let err = create(&store, dto("", "V-101", "U1")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.count("create_component"), 0);

        let created = create(&store, dto(" LDAR-1 ", "V-101", "Unit 1"))
            .await
            .unwrap();
        assert_eq!(created.drawing, "LDAR-1");
    }

    #[tokio::test]
    async fn test_update_changes_fields() {
        let store = RecordingStore::new();
        let c = store.seed_component("D1", "V-101", "U1").await;
        update(&store, c.id, dto("D9", "V-109", "U9")).await.unwrap();
        let reloaded = get_by_id(&store, c.id).await.unwrap();
        assert_eq!(reloaded.name, "V-109");
    }

    #[tokio::test]
    async fn test_missing_component_is_not_found() {
        let store = RecordingStore::new();
        let err = update(&store, ComponentId(999), dto("D", "V", "U"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);

        let err = delete(&store, ComponentId(999)).await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_readings_before_component() {
        let store = RecordingStore::new();
        let c = store.seed_component("D1", "V-101", "U1").await;
        seed_reading(&store, c.id).await;
        seed_reading(&store, c.id).await;

        delete(&store, c.id).await.unwrap();

        assert_eq!(
            store.calls(),
            vec!["delete_readings_for_component", "delete_component"]
        );
        assert_eq!(store.inner.reading_count(), 0);
        assert!(store.inner.list_components().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_stops_when_readings_delete_fails() {
        let store = RecordingStore::new();
        let c = store.seed_component("D1", "V-101", "U1").await;
        seed_reading(&store, c.id).await;
        store.fail_on("delete_readings_for_component");

        let err = delete(&store, c.id).await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::Api { .. })));
        assert_eq!(store.count("delete_component"), 0);
        assert_eq!(store.inner.list_components().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_attach_drawing() {
        let store = RecordingStore::new();
        let c = store.seed_component("D1", "V-101", "U1").await;

        let updated = attach_drawing(&store, c.id, b"%PDF-1.7 test".to_vec())
            .await
            .unwrap();
        let url = updated.drawing_pdf_url.unwrap();
        assert!(url.starts_with("memory://attachments/component_1_"));
        assert!(url.ends_with(".pdf"));
        assert_eq!(
            store.calls(),
            vec!["upload_file", "update_component_drawing_url", "get_component"]
        );
    }

    #[tokio::test]
    async fn test_attach_drawing_upload_failure_keeps_component() {
        let store = RecordingStore::new();
        let c = store.seed_component("D1", "V-101", "U1").await;
        store.fail_on("upload_file");

        assert!(attach_drawing(&store, c.id, b"%PDF".to_vec()).await.is_err());
        assert_eq!(store.count("update_component_drawing_url"), 0);

        let err = attach_drawing(&store, c.id, Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_drawing_file_name() {
        assert_eq!(
            drawing_file_name(ComponentId(12), 1_700_000_000_000),
            "component_12_1700000000000.pdf"
        );
    }
}
