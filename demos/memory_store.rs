use cloud_entity_store::{Customer, EntityStore, StorageConfig, StorageProviderFactory, TableEntity};

#[tokio::main]
async fn main() {
    let provider = StorageProviderFactory::from_config(StorageConfig::memory())
        .await
        .unwrap();
    let customers = EntityStore::<Customer>::open(provider).await.unwrap();

    let added = customers.add(Customer::new("A", "1", "Alice")).await.unwrap();
    println!("Added {} with tag {:?}", added.name, added.etag());

    // Two readers pick up the same version
    let mut first = customers.get("A", "1").await.unwrap().unwrap();
    let mut second = customers.get("A", "1").await.unwrap().unwrap();

    first.email = Some("alice@example.com".to_string());
    let first = customers.update(first).await.unwrap();
    println!("Updated email, new tag {:?}", first.etag());

    second.name = "Alice Smith".to_string();
    match customers.update(second).await {
        Ok(_) => println!("Unexpected: stale update applied"),
        Err(e) => println!("Rejected: {}", e),
    }

    // Re-read and retry
    let mut fresh = customers.get("A", "1").await.unwrap().unwrap();
    fresh.name = "Alice Smith".to_string();
    let fresh = customers.update(fresh).await.unwrap();
    println!("{:?}", fresh);
}
