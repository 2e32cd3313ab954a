//! Upload path templates.
//!
//! The data layer only computes the deterministic path string for an upload;
//! the files themselves live with an external storage service.

use uuid::Uuid;

/// `uploads/user_{user_id}/avatar_{filename}`
pub fn avatar_path(user_id: Uuid, filename: &str) -> String {
    format!("uploads/user_{user_id}/avatar_{filename}")
}

/// `uploads/icons/category_{category_id}-{filename}`
pub fn category_icon_path(category_id: Uuid, filename: &str) -> String {
    format!("uploads/icons/category_{category_id}-{filename}")
}

/// `uploads/user_{seller_id}/ad_photos/{filename}`
pub fn ad_photo_path(seller_id: Uuid, filename: &str) -> String {
    format!("uploads/user_{seller_id}/ad_photos/{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_embed_owner_id() {
        let id = Uuid::nil();
        assert_eq!(
            avatar_path(id, "me.png"),
            format!("uploads/user_{id}/avatar_me.png")
        );
        assert_eq!(
            category_icon_path(id, "bikes.svg"),
            format!("uploads/icons/category_{id}-bikes.svg")
        );
        assert_eq!(
            ad_photo_path(id, "front.jpg"),
            format!("uploads/user_{id}/ad_photos/front.jpg")
        );
    }
}
