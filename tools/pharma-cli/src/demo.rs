//! Demo catalog served by the in-memory backend.

use pharma_commerce::prelude::*;
use pharma_sync::InMemoryBackend;

fn product(
    id: &str,
    name: &str,
    description: &str,
    net_rate: i64,
    mrp: i64,
    category: &Category,
    is_hot: bool,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        net_rate,
        mrp,
        photo: None,
        category: category.clone(),
        bonus_offer: None,
        is_hot,
    }
}

/// Backend seeded with a small wholesale catalog.
pub fn backend() -> InMemoryBackend {
    let antibiotics = Category::new("antibiotics", "Antibiotics");
    let analgesics = Category::new("analgesics", "Analgesics");
    let antacids = Category::new("antacids", "Antacids");

    let mut amoxicillin = product(
        "amox-500",
        "Amoxicillin 500mg",
        "Capsules, strip of 10",
        100,
        125,
        &antibiotics,
        true,
    );
    amoxicillin.bonus_offer = Some("10+1 free".to_string());

    InMemoryBackend::new()
        .with_category(antibiotics.clone())
        .with_category(analgesics.clone())
        .with_category(antacids.clone())
        .with_product(amoxicillin)
        .with_product(product(
            "azi-250",
            "Azithromycin 250mg",
            "Tablets, strip of 6",
            180,
            220,
            &antibiotics,
            false,
        ))
        .with_product(product(
            "para-650",
            "Paracetamol 650mg",
            "Tablets, strip of 15",
            50,
            65,
            &analgesics,
            true,
        ))
        .with_product(product(
            "ibu-400",
            "Ibuprofen 400mg",
            "Tablets, strip of 10",
            45,
            60,
            &analgesics,
            false,
        ))
        .with_product(product(
            "panto-40",
            "Pantoprazole 40mg",
            "Gastro-resistant tablets, strip of 10",
            90,
            118,
            &antacids,
            false,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharma_sync::Backend;

    #[tokio::test]
    async fn test_demo_catalog() {
        let backend = backend();
        assert_eq!(backend.get_all_products().await.unwrap().len(), 5);
        assert_eq!(backend.get_hot_products().await.unwrap().len(), 2);
        assert_eq!(backend.get_all_categories().await.unwrap().len(), 3);
    }
}
