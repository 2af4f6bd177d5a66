//! End-to-end inspection of synthetic backup archives: an outer zip whose
//! `export.xml` lists domains, with each domain's configuration in a nested
//! zip of its own.

use dpaudit_core::category::Category;
use dpaudit_core::inspect;
use dpaudit_core::model::FieldValue;
use dpaudit_core::report;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn backup_of(domains: &[(&str, &str)]) -> Vec<u8> {
    let domain_list: String = domains
        .iter()
        .map(|(name, _)| format!("<domain name=\"{name}\"/>"))
        .collect();
    let manifest = format!(
        "<datapower-configuration><domains>{domain_list}</domains></datapower-configuration>"
    );
    let mut entries: Vec<(String, Vec<u8>)> =
        vec![("export.xml".to_string(), manifest.into_bytes())];
    for (name, export_xml) in domains {
        let inner = zip_of(&[("export.xml", export_xml.as_bytes())]);
        entries.push((format!("{name}.zip"), inner));
    }
    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(n, d)| (n.as_str(), d.as_slice()))
        .collect();
    zip_of(&borrowed)
}

const DEFAULT_DOMAIN: &str = r#"<datapower-configuration>
  <configuration>
    <MultiProtocolGateway name="orders-gw">
      <Type>static-backend</Type>
      <StylePolicy>orders-policy</StylePolicy>
    </MultiProtocolGateway>
    <StylePolicy name="orders-policy">
      <PolicyMaps>
        <Match>match-all</Match>
        <Rule>orders_req</Rule>
      </PolicyMaps>
    </StylePolicy>
    <Matching name="match-all">
      <CombineWithOr>off</CombineWithOr>
      <MatchRules>
        <Type>url</Type>
        <Url>*</Url>
      </MatchRules>
    </Matching>
    <StylePolicyRule name="orders_req">
      <Direction>request-rule</Direction>
      <Actions>orders_req_aaa_0</Actions>
      <Actions>orders_req_xform_1</Actions>
      <Actions>orders_req_results_2</Actions>
    </StylePolicyRule>
    <StylePolicyAction name="orders_req_aaa_0">
      <AAA>orders-aaa</AAA>
    </StylePolicyAction>
    <StylePolicyAction name="orders_req_xform_1">
      <Transform>local:///normalize.xsl</Transform>
    </StylePolicyAction>
    <StylePolicyAction name="orders_req_results_2"/>
  </configuration>
</datapower-configuration>"#;

const PARTNER_DOMAIN: &str = r#"<datapower-configuration>
  <configuration>
    <WSGateway name="partner-ws">
      <Type>static-from-wsdl</Type>
      <StylePolicy>partner-policy</StylePolicy>
    </WSGateway>
    <WSStylePolicy name="partner-policy">
      <PolicyMaps>
        <Match>match-soap</Match>
        <Rule>partner_res</Rule>
      </PolicyMaps>
    </WSStylePolicy>
    <Matching name="match-soap">
      <CombineWithOr>on</CombineWithOr>
    </Matching>
    <WSStylePolicyRule name="partner_res">
      <Direction>response-rule</Direction>
      <Actions>partner_res_log_0</Actions>
    </WSStylePolicyRule>
    <StylePolicyAction name="partner_res_log_0">
      <LogType>urlopen</LogType>
      <Destination>local:///log</Destination>
    </StylePolicyAction>
  </configuration>
</datapower-configuration>"#;

#[test]
fn inspects_a_two_domain_backup() {
    let bytes = backup_of(&[("default", DEFAULT_DOMAIN), ("partner", PARTNER_DOMAIN)]);
    let backup = inspect::inspect_backup_bytes(&bytes).unwrap();

    // Domain insertion order follows the listing in the outer export.xml.
    let names: Vec<&String> = backup.domains.keys().collect();
    assert_eq!(names, ["default", "partner"]);

    let default = &backup.domains["default"];
    let rule = &default.mpgs["orders-gw"].policy["orders-policy"].rules["orders_req"];
    assert_eq!(rule.direction.as_deref(), Some("request-rule"));
    // The trailing results action is a no-op and leaves no record.
    assert_eq!(rule.actions.len(), 2);
    assert_eq!(rule.actions[0].type_key(), Some("aaa"));
    assert_eq!(
        rule.actions[0].field("policy"),
        Some(&FieldValue::Text("orders-aaa".into()))
    );
    assert_eq!(rule.actions[1].type_key(), Some("xform"));

    let partner = &backup.domains["partner"];
    assert!(partner.mpgs.is_empty());
    let ws_rule = &partner.wsps["partner-ws"].policy["partner-policy"].rules["partner_res"];
    assert_eq!(ws_rule.actions.len(), 1);
    assert_eq!(ws_rule.actions[0].type_key(), Some("log"));
}

#[test]
fn ws_gateway_policy_reference_resolves_through_style_policy_child() {
    // Both gateway kinds carry the policy name in a StylePolicy child; only
    // the definition element kind differs. The partner fixture encodes that
    // schema, so its whole subtree must survive inspection.
    let bytes = backup_of(&[("partner", PARTNER_DOMAIN)]);
    let backup = inspect::inspect_backup_bytes(&bytes).unwrap();

    let gw = &backup.domains["partner"].wsps["partner-ws"];
    assert!(!gw.policy.is_empty());
    let rule = &gw.policy["partner-policy"].rules["partner_res"];
    assert_eq!(rule.actions.len(), 1);
    assert_eq!(rule.actions[0].type_key(), Some("log"));
}

#[test]
fn missing_domain_archive_is_skipped_not_fatal() {
    // Manifest lists a second domain whose zip is absent from the archive.
    let manifest = br#"<datapower-configuration>
  <domains><domain name="default"/><domain name="ghost"/></domains>
</datapower-configuration>"#;
    let inner = zip_of(&[("export.xml", DEFAULT_DOMAIN.as_bytes())]);
    let bytes = zip_of(&[("export.xml", manifest), ("default.zip", &inner)]);

    let backup = inspect::inspect_backup_bytes(&bytes).unwrap();
    assert_eq!(backup.domains.len(), 1);
    assert!(backup.domains.contains_key("default"));
}

#[test]
fn corrupt_domain_archive_is_skipped_not_fatal() {
    let manifest = br#"<datapower-configuration>
  <domains><domain name="broken"/></domains>
</datapower-configuration>"#;
    let bytes = zip_of(&[("export.xml", manifest), ("broken.zip", b"not a zip")]);

    let backup = inspect::inspect_backup_bytes(&bytes).unwrap();
    assert!(backup.domains.is_empty());
}

#[test]
fn backup_without_manifest_is_an_error() {
    let bytes = zip_of(&[("readme.txt", b"nothing here")]);
    assert!(inspect::inspect_backup_bytes(&bytes).is_err());
}

#[test]
fn grouped_report_spans_domains() {
    let bytes = backup_of(&[("default", DEFAULT_DOMAIN), ("partner", PARTNER_DOMAIN)]);
    let backup = inspect::inspect_backup_bytes(&bytes).unwrap();
    let groups = report::group_by_category(&backup);

    let security = &groups[&Category::Security];
    let aaa = &security["orders-policy/orders_req_aaa_0"];
    assert_eq!(aaa.gateways.len(), 1);
    assert_eq!(aaa.gateways[0].name, "orders-gw");
    assert_eq!(aaa.gateways[0].domain, "default");

    let logging = &groups[&Category::Logging];
    let log = &logging["partner-policy/partner_res_log_0"];
    assert_eq!(log.gateways[0].domain, "partner");
    assert_eq!(log.direction.as_deref(), Some("response-rule"));
}

#[test]
fn serialized_output_keys_records_by_type() {
    let bytes = backup_of(&[("default", DEFAULT_DOMAIN)]);
    let backup = inspect::inspect_backup_bytes(&bytes).unwrap();
    let yaml = serde_yaml::to_string(&backup).unwrap();
    assert!(yaml.contains("aaa:"));
    assert!(yaml.contains("name: orders_req_aaa_0"));
    assert!(yaml.contains("policy: orders-aaa"));
    assert!(yaml.contains("xslt: local:///normalize.xsl"));
}
