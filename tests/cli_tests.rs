#[cfg(test)]
mod tests {
    use clap::Parser;
    use midiprobe::*;

    #[cfg(feature = "test-mock")]
    #[test]
    fn test_device_list() {
        let devices = cli::handle_device_list();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0], "Mock Device 1");
        assert_eq!(devices[1], "Mock Device 2");
    }

    #[test]
    fn test_default_command_is_monitor() {
        let args = Args::parse_from(["test"]);
        assert_eq!(args.command(), Command::Monitor);
        assert_eq!(args.input, None);
        assert!(!args.device_list);
    }

    #[test]
    fn test_args_with_ports() {
        let args = Args::parse_from(["test", "--input", "Keystation", "--output", "Synth"]);
        assert_eq!(args.input, Some("Keystation".to_string()));
        assert_eq!(args.output, Some("Synth".to_string()));
    }

    #[test]
    fn test_classify_collects_hex_tokens() {
        let args = Args::parse_from(["test", "classify", "f0", "01", "f7"]);
        assert_eq!(
            args.command(),
            Command::Classify {
                bytes: vec!["f0".to_string(), "01".to_string(), "f7".to_string()]
            }
        );
    }

    #[test]
    fn test_send_requires_bytes() {
        assert!(Args::try_parse_from(["test", "send"]).is_err());
    }

    #[test]
    fn test_valid_device_binding() {
        let devices = vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()];
        assert!(validate_device("Device 2", &devices).is_ok());
    }

    #[test]
    fn test_invalid_device_binding_lists_devices() {
        let devices = vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()];
        let err = validate_device("Nonexistent Device", &devices).unwrap_err();
        assert!(err.contains("'Nonexistent Device' not found"));
        assert!(err.contains("  - Mock Device 1\n"));
        assert!(err.contains("  - Mock Device 2\n"));
    }
}
