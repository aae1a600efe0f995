//! # Integration Tests
//!
//! Cross-crate end-to-end flows: configuration -> collaborators -> upload
//! pipeline -> persisted, resolvable assignments.

#[cfg(test)]
mod contract_tests {
    use contracts::{ConfigVersion, ServiceConfig, StorageBackend};

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert_eq!(config.version, ConfigVersion::V1);
        assert_eq!(config.storage.backend, StorageBackend::JsonFile);

        let toml = config_loader::ConfigLoader::to_toml(&config).unwrap();
        let back = config_loader::ConfigLoader::load_from_str(
            &toml,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(back.ingestion.max_upload_bytes, config.ingestion.max_upload_bytes);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;
    use std::sync::Arc;

    use contracts::{InputFormat, ServiceConfig, Worker};
    use distribution::{
        assignment_loads, DistributionError, ErrorKind, Upload, UploadPipeline,
    };
    use ingestion::NormalizerConfig;
    use rust_xlsxwriter::Workbook;
    use storage::{
        ConfiguredRegistry, ConfiguredStore, JsonFileAssignmentStore, JsonWorkerRegistry,
        MemoryAssignmentStore, StaticWorkerRegistry,
    };
    use tempfile::tempdir;

    const LEADS_CSV: &str = "\
FirstName,Phone,Notes
Amy,111,
,222,no name
Bo,333,vip
Cy,444,
Di,,no phone
Ed,555,call back
";

    fn write_config(dir: &Path, workers_file: &Path) -> ServiceConfig {
        let path = dir.join("config.toml");
        let body = format!(
            r#"
[ingestion]
max_upload_bytes = 1048576

[storage]
backend = "json_file"
path = "{store}"

[registry]
path = "{workers}"

[observability]
log_level = "debug"
"#,
            store = dir.join("assignments").display().to_string().replace('\\', "/"),
            workers = workers_file.display().to_string().replace('\\', "/"),
        );
        std::fs::write(&path, body).unwrap();
        config_loader::ConfigLoader::load_from_path(&path).unwrap()
    }

    fn leads_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "FirstName").unwrap();
        sheet.write_string(0, 1, "Phone").unwrap();
        sheet.write_string(0, 2, "Notes").unwrap();
        sheet.write_string(1, 0, "Amy").unwrap();
        sheet.write_number(1, 1, 919876543210.0).unwrap();
        sheet.write_string(2, 0, "Bo").unwrap();
        sheet.write_string(2, 2, "missing phone").unwrap();
        sheet.write_string(3, 0, "Cy").unwrap();
        sheet.write_string(3, 1, "444").unwrap();
        sheet.write_string(3, 2, "evening").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    /// Config file -> JSON registry + JSON file store -> upload -> listing
    #[tokio::test]
    async fn test_e2e_csv_upload_to_listing() {
        let dir = tempdir().unwrap();
        let workers_file = dir.path().join("workers.json");
        std::fs::write(
            &workers_file,
            r#"[
                {"id": "w1", "name": "Asha", "email": "asha@example.com"},
                {"id": "w2", "name": "Ben"},
                {"id": "w3", "name": "Cara"}
            ]"#,
        )
        .unwrap();

        let config = write_config(dir.path(), &workers_file);
        let pipeline = UploadPipeline::new(
            ConfiguredRegistry::from_config(&config),
            ConfiguredStore::from_config(&config).unwrap(),
            NormalizerConfig::from(&config.ingestion),
        );

        let outcome = pipeline
            .upload(Upload::new("leads.csv", LEADS_CSV))
            .await
            .unwrap();

        assert_eq!(outcome.total_rows(), 6);
        assert_eq!(outcome.processed(), 4);
        assert_eq!(
            outcome.message(),
            "File uploaded and distributed successfully. 4 items processed."
        );

        let assigned: Vec<_> = outcome
            .assignment
            .assignment
            .items
            .iter()
            .map(|i| (i.record.first_name.as_str(), i.worker_id.as_str()))
            .collect();
        assert_eq!(
            assigned,
            vec![("Amy", "w1"), ("Bo", "w2"), ("Cy", "w3"), ("Ed", "w1")]
        );

        let loads: Vec<_> = outcome.per_worker.iter().map(|l| l.items).collect();
        assert_eq!(loads, vec![2, 1, 1]);

        // One document on disk
        let stored_file = dir
            .path()
            .join("assignments")
            .join(format!("{}.json", outcome.assignment.id));
        assert!(stored_file.exists());

        // Remove a worker; listing resolves it to None
        std::fs::write(&workers_file, r#"[{"id": "w1", "name": "Asha"}]"#).unwrap();
        let listed = pipeline.list_assignments().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, outcome.assignment.id);

        let per_worker = assignment_loads(&listed[0]);
        let names: Vec<_> = per_worker
            .iter()
            .map(|l| (l.worker_id.as_str(), l.name.as_deref(), l.items))
            .collect();
        assert_eq!(
            names,
            vec![("w1", Some("Asha"), 2), ("w2", None, 1), ("w3", None, 1)]
        );
    }

    #[tokio::test]
    async fn test_e2e_spreadsheet_upload() {
        let dir = tempdir().unwrap();
        let store = JsonFileAssignmentStore::new("json", dir.path()).unwrap();
        let registry = StaticWorkerRegistry::new(
            "static",
            vec![Worker::new("w1", "Asha"), Worker::new("w2", "Ben")],
        );
        let pipeline = UploadPipeline::new(registry, store, NormalizerConfig::default());

        let outcome = pipeline
            .upload(Upload::new("leads.xlsx", leads_workbook()))
            .await
            .unwrap();

        assert_eq!(outcome.format, InputFormat::Spreadsheet);
        assert_eq!(outcome.total_rows(), 3);
        assert_eq!(outcome.processed(), 2);

        let items = &outcome.assignment.assignment.items;
        assert_eq!(items[0].record.phone, "919876543210");
        assert_eq!(items[0].worker_id, "w1");
        assert_eq!(items[1].record.first_name, "Cy");
        assert_eq!(items[1].record.notes, "evening");
        assert_eq!(items[1].worker_id, "w2");

        // Survives a reopen of the store
        let reopened = JsonFileAssignmentStore::new("json", dir.path()).unwrap();
        let listed = distribution::ListQuery::new(&reopened, pipeline.registry())
            .list_all()
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].items[0].record.phone, "919876543210");
    }

    #[tokio::test]
    async fn test_e2e_rejections_persist_nothing() {
        let dir = tempdir().unwrap();
        let workers_file = dir.path().join("workers.json");
        std::fs::write(&workers_file, "[]").unwrap();

        let config = write_config(dir.path(), &workers_file);
        let pipeline = UploadPipeline::new(
            ConfiguredRegistry::from_config(&config),
            ConfiguredStore::from_config(&config).unwrap(),
            NormalizerConfig::from(&config.ingestion),
        );

        let err = pipeline
            .upload(Upload::new("leads.csv", LEADS_CSV))
            .await
            .unwrap_err();
        assert!(matches!(err, DistributionError::NoWorkers));

        std::fs::write(&workers_file, r#"[{"id": "w1", "name": "Asha"}]"#).unwrap();
        let err = pipeline
            .upload(Upload::new("leads.csv", "Name,Mobile\nAmy,111\nBo,222\n"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DistributionError::NoValidRecords { total_rows: 2 }
        ));

        let err = pipeline
            .upload(Upload::new("leads.xlsx", "FirstName,Phone\nAmy,1\n"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        std::fs::write(&workers_file, "not json").unwrap();
        let err = pipeline
            .upload(Upload::new("leads.csv", LEADS_CSV))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Registry);
        assert!(!err.is_caller_error());

        std::fs::write(&workers_file, r#"[{"id": "w1", "name": "Asha"}]"#).unwrap();
        assert!(pipeline.list_assignments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_registry_ids_reject_upload() {
        let dir = tempdir().unwrap();
        let workers_file = dir.path().join("workers.json");
        std::fs::write(
            &workers_file,
            r#"[{"id": "W1", "name": "a"}, {"id": "W1", "name": "b"}]"#,
        )
        .unwrap();

        let pipeline = UploadPipeline::new(
            JsonWorkerRegistry::new("file", &workers_file),
            MemoryAssignmentStore::default(),
            NormalizerConfig::default(),
        );
        let err = pipeline
            .upload(Upload::new("a.csv", "FirstName,Phone\nAmy,1\nBo,2\n"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Registry);
        assert!(pipeline.store().is_empty().await);
    }

    /// Concurrent uploads each take their own snapshot and persist
    /// independently
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads() {
        let registry = StaticWorkerRegistry::new(
            "static",
            vec![Worker::new("w1", "Asha"), Worker::new("w2", "Ben")],
        );
        let pipeline = Arc::new(UploadPipeline::new(
            registry,
            MemoryAssignmentStore::default(),
            NormalizerConfig::default(),
        ));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move {
                    let body: String = std::iter::once("FirstName,Phone\n".to_string())
                        .chain((0..=i).map(|n| format!("c{n},{n}\n")))
                        .collect();
                    pipeline
                        .upload(Upload::new(format!("batch-{i}.csv"), body))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = pipeline.list_assignments().await.unwrap();
        assert_eq!(listed.len(), 8);

        let total: usize = listed.iter().map(|a| a.items.len()).sum();
        assert_eq!(total, (1..=8).sum::<usize>());

        for assignment in &listed {
            let loads = assignment_loads(assignment);
            let w1 = loads.iter().find(|l| l.worker_id == "w1").map_or(0, |l| l.items);
            let w2 = loads.iter().find(|l| l.worker_id == "w2").map_or(0, |l| l.items);
            assert!(w1 >= w2 && w1 - w2 <= 1, "unbalanced {}", assignment.file_name);
        }
    }

    #[tokio::test]
    async fn test_json_registry_snapshot_order_drives_assignment() {
        let dir = tempdir().unwrap();
        let workers_file = dir.path().join("workers.json");
        std::fs::write(
            &workers_file,
            r#"[{"id": "z", "name": "Zed"}, {"id": "a", "name": "Abe"}]"#,
        )
        .unwrap();

        let pipeline = UploadPipeline::new(
            JsonWorkerRegistry::new("file", &workers_file),
            MemoryAssignmentStore::default(),
            NormalizerConfig::default(),
        );
        let outcome = pipeline
            .upload(Upload::new("a.csv", "FirstName,Phone\nAmy,1\nBo,2\nCy,3\n"))
            .await
            .unwrap();

        let order: Vec<_> = outcome
            .assignment
            .assignment
            .items
            .iter()
            .map(|i| i.worker_id.as_str())
            .collect();
        assert_eq!(order, vec!["z", "a", "z"]);
    }
}
