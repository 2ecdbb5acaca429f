use std::collections::HashSet;
use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/diseases.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    let diseases = catalog.get("diseases").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'diseases' field\n\
             The catalog must have a top-level 'diseases' array.\n"
        );
    });

    let diseases = diseases.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'diseases' must be an array\n\
             Got: {diseases}\n"
        );
    });

    let total_links = validate_diseases(diseases);

    println!(
        "cargo:warning=Validated catalog: {} diseases, {total_links} disease-symptom links",
        diseases.len()
    );
}

fn validate_diseases(diseases: &[serde_json::Value]) -> usize {
    let mut seen_ids = HashSet::new();
    let mut total_links = 0;

    for (i, disease) in diseases.iter().enumerate() {
        let id = disease
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_else(|| {
                panic!(
                    "\n\nCATALOG BUILD ERROR: Disease at index {i} missing numeric 'id' field\n"
                );
            });

        assert!(
            id > 0,
            "\n\nCATALOG BUILD ERROR: Disease at index {i} has id 0\n\
             Disease ids must be positive.\n"
        );
        assert!(
            seen_ids.insert(id),
            "\n\nCATALOG BUILD ERROR: Duplicate disease id {id} (index {i})\n"
        );
        assert!(
            disease.get("name").and_then(serde_json::Value::as_str).is_some(),
            "\n\nCATALOG BUILD ERROR: Disease {id} (index {i}) missing 'name' field\n"
        );

        total_links += validate_disease_symptoms(disease, id);
    }

    total_links
}

fn validate_disease_symptoms(disease: &serde_json::Value, id: u64) -> usize {
    let symptoms = disease
        .get("symptoms")
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| {
            panic!("\n\nCATALOG BUILD ERROR: Disease {id} missing 'symptoms' array\n");
        });

    for (j, symptom) in symptoms.iter().enumerate() {
        let name = symptom.as_str().unwrap_or_else(|| {
            panic!("\n\nCATALOG BUILD ERROR: Disease {id} symptom {j} is not a string\n");
        });
        assert!(
            !name.trim().is_empty(),
            "\n\nCATALOG BUILD ERROR: Disease {id} symptom {j} is blank\n"
        );
    }

    symptoms.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/diseases.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
