use super::*;

use async_trait::async_trait;
use shared::protocol::NewLeadMagnet;

use crate::error::ClientError;

fn lead_magnet(id: &str, title: &str) -> LeadMagnet {
    LeadMagnet {
        id: LeadMagnetId::new(id),
        title: title.to_string(),
        description: format!("{title} description"),
        download_url: format!("https://files.example.com/{id}.pdf"),
        downloads: 7,
        created_at: None,
        updated_at: None,
    }
}

fn draft(title: &str, download_url: &str) -> LeadMagnetDraft {
    LeadMagnetDraft {
        title: title.to_string(),
        description: "Free guide".to_string(),
        download_url: download_url.to_string(),
    }
}

#[derive(Default)]
struct FakeLeadMagnetStore {
    items: Mutex<Vec<LeadMagnet>>,
    calls: Mutex<Vec<&'static str>>,
    fail_with: Option<u16>,
}

impl FakeLeadMagnetStore {
    fn with_items(items: Vec<LeadMagnet>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    async fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().await.push(operation);
        match self.fail_with {
            Some(status) => Err(ClientError::Status {
                endpoint: operation.to_string(),
                status,
                message: "rejected".into(),
            }),
            None => Ok(()),
        }
    }

    fn not_found(id: &LeadMagnetId) -> ClientError {
        ClientError::NotFound {
            entity: "lead magnet",
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl LeadMagnetStore for FakeLeadMagnetStore {
    async fn list_lead_magnets(&self) -> Result<Vec<LeadMagnet>> {
        self.record("list").await?;
        Ok(self.items.lock().await.clone())
    }

    async fn create_lead_magnet(&self, new_item: &NewLeadMagnet) -> Result<LeadMagnet> {
        self.record("create").await?;
        let mut items = self.items.lock().await;
        let created = LeadMagnet {
            id: LeadMagnetId::new(format!("lm-{}", items.len() + 1)),
            title: new_item.title.clone(),
            description: new_item.description.clone(),
            download_url: new_item.download_url.to_string(),
            downloads: 0,
            created_at: None,
            updated_at: None,
        };
        items.push(created.clone());
        Ok(created)
    }

    async fn replace_lead_magnet(
        &self,
        id: &LeadMagnetId,
        replacement: &NewLeadMagnet,
    ) -> Result<LeadMagnet> {
        self.record("replace").await?;
        let mut items = self.items.lock().await;
        let stored = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        stored.title = replacement.title.clone();
        stored.description = replacement.description.clone();
        stored.download_url = replacement.download_url.to_string();
        Ok(stored.clone())
    }

    async fn delete_lead_magnet(&self, id: &LeadMagnetId) -> Result<()> {
        self.record("delete").await?;
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

#[tokio::test]
async fn load_keeps_server_order() {
    let store = Arc::new(FakeLeadMagnetStore::with_items(vec![
        lead_magnet("b", "Checklist"),
        lead_magnet("a", "Ebook"),
    ]));
    let controller = LeadMagnetController::new(store);

    let loaded = controller.load().await.expect("load");

    assert_eq!(loaded[0].title, "Checklist");
    assert_eq!(controller.lead_magnets().await, loaded);
}

#[tokio::test]
async fn add_rejects_invalid_download_url_without_calling_store() {
    let store = Arc::new(FakeLeadMagnetStore::default());
    let controller = LeadMagnetController::new(store.clone());

    let err = controller
        .add(&draft("Ebook", "files/ebook.pdf"))
        .await
        .expect_err("relative url");

    match err {
        ClientError::Validation(validation) => assert_eq!(validation.field, "downloadUrl"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store.calls.lock().await.is_empty());
    assert!(controller.lead_magnets().await.is_empty());
}

#[tokio::test]
async fn add_appends_created_item() {
    let store = Arc::new(FakeLeadMagnetStore::with_items(vec![lead_magnet("a", "Ebook")]));
    let controller = LeadMagnetController::new(store);
    controller.load().await.expect("load");

    let created = controller
        .add(&draft("Template pack", "https://files.example.com/pack.zip"))
        .await
        .expect("add");

    assert_eq!(created.downloads, 0);
    let items = controller.lead_magnets().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[1], created);
}

#[tokio::test]
async fn update_replaces_item_in_place() {
    let store = Arc::new(FakeLeadMagnetStore::with_items(vec![
        lead_magnet("a", "Ebook"),
        lead_magnet("b", "Checklist"),
    ]));
    let controller = LeadMagnetController::new(store);
    controller.load().await.expect("load");

    controller
        .update(
            &LeadMagnetId::new("a"),
            &draft("Ebook 2nd edition", "https://files.example.com/ebook-2.pdf"),
        )
        .await
        .expect("update");

    let items = controller.lead_magnets().await;
    assert_eq!(items[0].title, "Ebook 2nd edition");
    assert_eq!(items[0].downloads, 7);
    assert_eq!(items[1].title, "Checklist");
}

#[tokio::test]
async fn remove_of_missing_item_still_drops_local_copy() {
    let store = Arc::new(FakeLeadMagnetStore::with_items(vec![lead_magnet("a", "Ebook")]));
    let controller = LeadMagnetController::new(store.clone());
    controller.load().await.expect("load");
    store.items.lock().await.clear();

    let err = controller
        .remove(&LeadMagnetId::new("a"))
        .await
        .expect_err("already deleted");

    assert!(err.is_not_found());
    assert!(controller.lead_magnets().await.is_empty());
}

#[tokio::test]
async fn rejected_remove_keeps_item() {
    let store = Arc::new(FakeLeadMagnetStore {
        items: Mutex::new(vec![lead_magnet("a", "Ebook")]),
        fail_with: Some(500),
        ..FakeLeadMagnetStore::default()
    });
    let controller = LeadMagnetController::new(store.clone());
    *controller.items.lock().await = vec![lead_magnet("a", "Ebook")];

    let err = controller
        .remove(&LeadMagnetId::new("a"))
        .await
        .expect_err("store failure");

    assert!(err.is_fetch());
    assert_eq!(controller.lead_magnets().await.len(), 1);
}
