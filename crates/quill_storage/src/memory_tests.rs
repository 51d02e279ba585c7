use pretty_assertions::assert_eq;

use super::*;

#[test_log::test(tokio::test)]
async fn test_get_missing_connection() {
    let store = MemoryConnectionStore::new();

    let connection = store.get_connection_id(&UserId::new("nobody")).await.unwrap();
    assert_eq!(connection, None);
}

#[test_log::test(tokio::test)]
async fn test_set_replaces_current_connection() {
    let user = UserId::new("u-1");
    let store = MemoryConnectionStore::new().with_connection("u-1", "conn-old");

    store
        .set_connection_id(&user, ConnectionId::new("conn-new"))
        .await
        .unwrap();

    assert_eq!(
        store.get_connection_id(&user).await.unwrap(),
        Some(ConnectionId::new("conn-new"))
    );
}

#[test_log::test(tokio::test)]
async fn test_revoke() {
    let user = UserId::new("u-1");
    let store = MemoryConnectionStore::new().with_connection("u-1", "conn");

    assert_eq!(store.revoke(&user), Some(ConnectionId::new("conn")));
    assert_eq!(store.get_connection_id(&user).await.unwrap(), None);
}
