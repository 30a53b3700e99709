use serde_json::Value;
use skil_common::{FileUploadResponse, Resource};

pub fn print_resources(title: &str, resources: &[Resource]) {
    println!("\n=== {title} ===\n");
    if resources.is_empty() {
        println!("No resources found.");
        return;
    }
    println!(
        "{:<10} {:<30} {:<10} {:<15}",
        "ID", "Name", "Type", "Sub Type"
    );
    println!("{:-<68}", "");
    for r in resources {
        println!(
            "{:<10} {:<30} {:<10} {:<15}",
            r.resource_id,
            r.resource_name,
            r.resource_type.as_str(),
            r.sub_type.as_str()
        );
    }
    println!();
}

pub fn print_resource(resource: &Resource) {
    println!("\n=== Resource {} ===\n", resource.resource_id);
    println!("  Name:     {}", resource.resource_name);
    println!("  Type:     {}", resource.resource_type);
    println!("  Sub Type: {}", resource.sub_type);
    println!();
}

pub fn print_details(id: i64, details: &Value) {
    println!("\n=== Resource {id} details ===\n");
    match details.as_object() {
        Some(fields) if !fields.is_empty() => {
            for (key, value) in fields {
                let shown = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => "N/A".to_string(),
                    other => other.to_string(),
                };
                println!("  {:<22} {}", key, shown);
            }
        }
        _ => println!("  {details}"),
    }
    println!();
}

pub fn print_uploads(records: &[FileUploadResponse]) {
    for record in records {
        println!(
            "✓ {} → {} ({})",
            record.file_name,
            record.file_uri(),
            record.status.as_deref().unwrap_or("stored")
        );
    }
}
