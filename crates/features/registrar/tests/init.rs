use campus_database::Database;
use campus_registrar::{MIGRATIONS, Registrar, init};

#[tokio::test]
async fn init_creates_slice() {
    let db = Database::builder()
        .url("mem://")
        .session("campus_test", "init")
        .migrations(MIGRATIONS)
        .init()
        .await
        .expect("in-memory store");

    let slice = init(&db).expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<Registrar>());

    let registrar = slice.downcast::<Registrar>().expect("registrar slice");
    assert!(registrar.manager.list_students().await.expect("list").is_empty());
}
