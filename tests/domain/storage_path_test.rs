use anchorspan::domain::{JobId, JobItemId, StoragePath};

#[test]
fn given_job_and_item_when_building_result_path_then_format_is_job_slash_item_json() {
    let job_id = JobId::new();
    let item_id = JobItemId::new();

    let path = StoragePath::item_result(&job_id, &item_id);

    let expected = format!("{}/{}.json", job_id.as_uuid(), item_id.as_uuid());
    assert_eq!(path.as_str(), expected);
}

#[test]
fn given_absolute_document_path_when_parsing_then_leading_slashes_are_dropped() {
    assert_eq!(StoragePath::from_raw("/uploads/x.json").as_str(), "uploads/x.json");
    assert_eq!(StoragePath::from_raw("//uploads/x.json").as_str(), "uploads/x.json");
    assert_eq!(StoragePath::from_raw("uploads/x.json").as_str(), "uploads/x.json");
}

#[test]
fn given_storage_path_when_displayed_then_matches_as_str() {
    let path = StoragePath::from_raw("docs/a.json");

    assert_eq!(format!("{}", path), path.as_str());
}
