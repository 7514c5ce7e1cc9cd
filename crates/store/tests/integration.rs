//! Integration tests for store crate

#[cfg(test)]
mod tests {
    use maid_store::*;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_save_and_read_back() {
        let temp = tempdir().unwrap();
        let storage = LocalStorage::new(temp.path());

        let name = storage.save("docs/a.txt", b"hello").await.unwrap();
        assert_eq!(name, "docs/a.txt");
        assert!(storage.exists("docs/a.txt").await.unwrap());
        assert_eq!(storage.size("docs/a.txt").await.unwrap(), 5);

        let mut file = FieldFile::new(name);
        let mut contents = Vec::new();
        file.open(&storage)
            .await
            .unwrap()
            .read_to_end(&mut contents)
            .await
            .unwrap();
        assert_eq!(contents, b"hello");
        assert!(file.is_open());

        file.close();
        assert!(!file.is_open());
    }

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let temp = tempdir().unwrap();
        let storage = LocalStorage::new(temp.path());

        let first = storage.save("a.txt", b"one").await.unwrap();
        let second = storage.save("a.txt", b"two").await.unwrap();
        let third = storage.save("a.txt", b"three").await.unwrap();

        assert_eq!(first, "a.txt");
        assert_eq!(second, "a_1.txt");
        assert_eq!(third, "a_2.txt");
        assert_eq!(tokio::fs::read(temp.path().join("a.txt")).await.unwrap(), b"one");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let temp = tempdir().unwrap();
        let storage = LocalStorage::new(temp.path());

        storage.save("gone.txt", b"x").await.unwrap();
        storage.delete("gone.txt").await.unwrap();
        assert!(!storage.exists("gone.txt").await.unwrap());

        // Second delete of a missing file succeeds
        storage.delete("gone.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_field_file_delete_closes_handle() {
        let temp = tempdir().unwrap();
        let storage = LocalStorage::new(temp.path());
        storage.save("b.txt", b"bytes").await.unwrap();

        let mut file = FieldFile::new("b.txt");
        file.open(&storage).await.unwrap();
        file.delete(&storage).await.unwrap();

        assert!(!file.is_open());
        assert!(!storage.exists("b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let temp = tempdir().unwrap();
        let storage = LocalStorage::new(temp.path());

        let err = storage.open("missing.txt").await.err().unwrap();
        assert!(matches!(
            err,
            maid_errors::Error::Storage(maid_errors::StorageError::PathNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_names_are_rejected() {
        let temp = tempdir().unwrap();
        let storage = LocalStorage::new(temp.path());

        assert!(storage.save("../escape.txt", b"x").await.is_err());
        assert!(storage.delete("/abs.txt").await.is_err());
    }

    #[test]
    fn test_field_file_equality_and_clone() {
        let file = FieldFile::new("a.txt");
        let copy = file.clone();
        assert_eq!(file, copy);
        assert_ne!(file, FieldFile::new("b.txt"));
        assert!(FieldFile::new("").is_empty());
    }
}
