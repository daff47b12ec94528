//! JSON export of the metamodel

use serde_json::{Map, Number, Value};

use super::{walk_facet, walk_member, walk_metamodel, walk_parameter, walk_specification, MetaModelVisitor};
use crate::facet::{AttributeValue, Facet};
use crate::spec::{ObjectMember, ObjectSpecification, ParameterSpec, SpecificationLoader};

/// Export every built specification as a JSON document
///
/// ```json
/// { "generation": 0,
///   "specifications": [
///     { "class": "Customer", "kind": "class", "logicalTypeName": "crm.Customer",
///       "facets": [ { "type": "named", "origin": "fallback",
///                     "attributes": { "name": "Customer", "precedence": "inferred" } } ],
///       "members": [ { "id": "rename", "featureType": "action", "type": "void",
///                      "facets": [...], "parameters": [...] } ] } ] }
/// ```
pub fn export_json(loader: &SpecificationLoader) -> Value {
    let mut exporter = JsonExporter::default();
    walk_metamodel(&mut exporter, loader);

    let mut root = Map::new();
    root.insert("generation".to_string(), Value::from(loader.generation()));
    root.insert("specifications".to_string(), Value::Array(exporter.specs));
    Value::Object(root)
}

fn attribute_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Int(i) => Value::Number(Number::from(*i)),
        AttributeValue::Str(s) => Value::String(s.clone()),
        AttributeValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
    }
}

/// Builds nested objects with a frame per open element
#[derive(Default)]
struct JsonExporter {
    stack: Vec<Map<String, Value>>,
    specs: Vec<Value>,
}

impl JsonExporter {
    fn enter(&mut self, fields: &[(&str, Value)]) {
        let frame = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.stack.push(frame);
    }

    /// Close the current frame and append it to `key` of its parent
    fn leave_into(&mut self, key: &str) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let Some(parent) = self.stack.last_mut() else {
            return;
        };
        if let Value::Array(items) = parent
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            items.push(Value::Object(frame));
        }
    }
}

impl MetaModelVisitor for JsonExporter {
    fn visit_specification(&mut self, spec: &ObjectSpecification) {
        self.enter(&[
            ("class", Value::from(spec.class().as_str())),
            ("kind", Value::from(spec.kind().name())),
            ("logicalTypeName", Value::from(spec.logical_type_name())),
            ("facets", Value::Array(Vec::new())),
            ("members", Value::Array(Vec::new())),
        ]);
        walk_specification(self, spec);
        if let Some(frame) = self.stack.pop() {
            self.specs.push(Value::Object(frame));
        }
    }

    fn visit_member(&mut self, member: &ObjectMember) {
        self.enter(&[
            ("id", Value::from(member.id())),
            ("featureType", Value::from(member.feature_type().name())),
            ("type", Value::from(member.type_ref().to_string())),
            ("facets", Value::Array(Vec::new())),
        ]);
        walk_member(self, member);
        self.leave_into("members");
    }

    fn visit_parameter(&mut self, param: &ParameterSpec) {
        self.enter(&[
            ("index", Value::from(param.index())),
            ("name", Value::from(param.name())),
            ("type", Value::from(param.type_ref().to_string())),
            ("facets", Value::Array(Vec::new())),
        ]);
        walk_parameter(self, param);
        self.leave_into("parameters");
    }

    fn visit_facet(&mut self, facet: &Facet) {
        self.enter(&[
            ("type", Value::from(facet.facet_type().name())),
            ("origin", Value::from(facet.origin())),
            ("attributes", Value::Object(Map::new())),
        ]);
        walk_facet(self, facet);
        self.leave_into("facets");
    }

    fn visit_attribute(&mut self, name: &'static str, value: &AttributeValue) {
        if let Some(Value::Object(attrs)) = self.stack.last_mut().and_then(|f| f.get_mut("attributes")) {
            attrs.insert(name.to_string(), attribute_json(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassDescriptor, ClassName, ClassRegistry, Marker, MethodDescriptor, TypeRef};
    use crate::factory::ProgrammingModel;
    use std::sync::Arc;

    #[test]
    fn test_export_shape() {
        let registry = ClassRegistry::new().with(
            ClassDescriptor::new("Customer")
                .marker(Marker::new("DomainObject").with("logicalTypeName", "crm.Customer"))
                .method(
                    MethodDescriptor::new("getName")
                        .returns(TypeRef::class("string"))
                        .marker(Marker::new("Property").with("maxLength", 30)),
                ),
        );
        let loader = SpecificationLoader::new(Arc::new(registry), ProgrammingModel::new());
        loader.load(&ClassName::new("Customer")).unwrap();

        let json = export_json(&loader);
        assert_eq!(json["generation"], 0);
        let spec = &json["specifications"][0];
        assert_eq!(spec["class"], "Customer");
        assert_eq!(spec["logicalTypeName"], "crm.Customer");

        let name = &spec["members"][0];
        assert_eq!(name["id"], "name");
        assert_eq!(name["featureType"], "property");
        let max_length = name["facets"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["type"] == "max-length")
            .unwrap();
        assert_eq!(max_length["attributes"]["value"], 30);
        assert_eq!(max_length["attributes"]["precedence"], "explicit");
        assert_eq!(max_length["origin"], "member-annotations");
        assert!(name.get("parameters").is_none());
    }
}
