use crate::filter::Path;
use crate::patch::apply::{
    expand_object, ignored, is_required, patch_boolean, patch_scalar, patch_typed,
};
use crate::patch::operation::scalar_text;
use crate::patch::{
    OperationName, PatchOperation, PatchOutcome, PatchResult, PatchValue, Patchable,
};
use crate::resource::{Core2User, EnterpriseExtension, Manager, Name, ResourceKind};
use crate::schema::identifiers;

impl Patchable for Core2User {
    fn apply_operation(&mut self, operation: &PatchOperation) -> PatchResult<PatchOutcome> {
        let Some(path) = &operation.path else {
            let mut outcome = PatchOutcome::Ignored;
            for expanded in expand_object(operation)? {
                if self.apply_operation(&expanded)? == PatchOutcome::Applied {
                    outcome = PatchOutcome::Applied;
                }
            }
            return Ok(outcome);
        };

        match path.schema_identifier.as_deref() {
            Some(schema) if schema.eq_ignore_ascii_case(identifiers::CORE2_ENTERPRISE_USER) => {
                self.patch_enterprise(operation, path)
            }
            Some(schema) if !schema.eq_ignore_ascii_case(identifiers::CORE2_USER) => {
                ignored(Self::RESOURCE_TYPE, operation)
            }
            _ => self.patch_core(operation, path),
        }
    }
}

impl Core2User {
    fn patch_core(&mut self, operation: &PatchOperation, path: &Path) -> PatchResult<PatchOutcome> {
        let schema = identifiers::CORE2_USER;
        let name = path.attribute_path.to_ascii_lowercase();

        if matches!(name.as_str(), "emails" | "phonenumbers" | "roles") {
            let items = match name.as_str() {
                "emails" => &mut self.emails,
                "phonenumbers" => &mut self.phone_numbers,
                _ => &mut self.roles,
            };
            return patch_typed(items, operation, path, schema);
        }
        if name == "name" {
            return self.patch_name(operation, path);
        }
        if !path.sub_attributes.is_empty() || path.value_path.is_some() {
            return ignored(Self::RESOURCE_TYPE, operation);
        }

        let target = match name.as_str() {
            "active" => return patch_boolean(&mut self.active, operation),
            "username" => &mut self.user_name,
            "externalid" => &mut self.resource.external_id,
            "displayname" => &mut self.display_name,
            "nickname" => &mut self.nick_name,
            "title" => &mut self.title,
            "usertype" => &mut self.user_type,
            "preferredlanguage" => &mut self.preferred_language,
            "locale" => &mut self.locale,
            "timezone" => &mut self.timezone,
            "password" => &mut self.password,
            _ => return ignored(Self::RESOURCE_TYPE, operation),
        };
        patch_scalar(target, operation, is_required(schema, &path.attribute_path))
    }

    fn patch_name(&mut self, operation: &PatchOperation, path: &Path) -> PatchResult<PatchOutcome> {
        let Some(sub_attribute) = path.value_path_name() else {
            return match (operation.op, &operation.value) {
                (OperationName::Remove, _) => {
                    self.name = None;
                    Ok(PatchOutcome::Applied)
                }
                (_, Some(PatchValue::Object(object))) => {
                    if operation.op == OperationName::Replace {
                        self.name = None;
                    }
                    let mut outcome = PatchOutcome::Ignored;
                    for (key, value) in object {
                        let nested = PatchOperation::new(
                            operation.op,
                            Some(&format!("name.{}", key)),
                            Some(value.clone()),
                        )?;
                        if self.patch_name(&nested, nested.path.as_ref().unwrap_or(path))?
                            == PatchOutcome::Applied
                        {
                            outcome = PatchOutcome::Applied;
                        }
                    }
                    Ok(outcome)
                }
                _ => ignored(Self::RESOURCE_TYPE, operation),
            };
        };

        let name = self.name.get_or_insert_with(Name::default);
        let target = match sub_attribute.to_ascii_lowercase().as_str() {
            "formatted" => &mut name.formatted,
            "familyname" => &mut name.family_name,
            "givenname" => &mut name.given_name,
            "middlename" => &mut name.middle_name,
            "honorificprefix" => &mut name.honorific_prefix,
            "honorificsuffix" => &mut name.honorific_suffix,
            _ => return ignored(Self::RESOURCE_TYPE, operation),
        };
        let outcome = patch_scalar(target, operation, false)?;
        if self.name.as_ref().is_some_and(|name| name == &Name::default()) {
            self.name = None;
        }
        Ok(outcome)
    }

    fn patch_enterprise(
        &mut self,
        operation: &PatchOperation,
        path: &Path,
    ) -> PatchResult<PatchOutcome> {
        if path.attribute_path.is_empty() {
            return match (operation.op, &operation.value) {
                (OperationName::Remove, _) => {
                    self.enterprise = None;
                    Ok(PatchOutcome::Applied)
                }
                (_, Some(PatchValue::Object(object))) => {
                    let mut outcome = PatchOutcome::Ignored;
                    for (key, value) in object {
                        let nested = PatchOperation::new(
                            operation.op,
                            Some(&format!("{}:{}", identifiers::CORE2_ENTERPRISE_USER, key)),
                            Some(value.clone()),
                        )?;
                        if self.apply_operation(&nested)? == PatchOutcome::Applied {
                            outcome = PatchOutcome::Applied;
                        }
                    }
                    Ok(outcome)
                }
                _ => ignored(Self::RESOURCE_TYPE, operation),
            };
        }

        if operation.op == OperationName::Remove && self.enterprise.is_none() {
            return Ok(PatchOutcome::Applied);
        }
        let name = path.attribute_path.to_ascii_lowercase();
        if name == "manager" {
            return patch_manager(self.enterprise_mut(), operation, path);
        }
        let extension = self.enterprise_mut();
        let target = match name.as_str() {
            "employeenumber" => &mut extension.employee_number,
            "costcenter" => &mut extension.cost_center,
            "organization" => &mut extension.organization,
            "division" => &mut extension.division,
            "department" => &mut extension.department,
            _ => return ignored(Self::RESOURCE_TYPE, operation),
        };
        patch_scalar(target, operation, false)
    }
}

/// `manager` as a whole object, or `manager.value` alone.
fn patch_manager(
    extension: &mut EnterpriseExtension,
    operation: &PatchOperation,
    path: &Path,
) -> PatchResult<PatchOutcome> {
    match (operation.op, path.value_path_name(), &operation.value) {
        (OperationName::Remove, None, _) => extension.manager = None,
        (_, Some(sub), _) if sub.eq_ignore_ascii_case("value") => {
            let manager = extension.manager.get_or_insert_with(Manager::default);
            patch_scalar(&mut manager.value, operation, false)?;
            if manager == &Manager::default() {
                extension.manager = None;
            }
        }
        (_, None, Some(PatchValue::Object(object))) => {
            let text = |key: &str| object.get(key).and_then(scalar_text);
            extension.manager = Some(Manager {
                value: text("value"),
                reference: text("$ref"),
                display_name: text("displayName"),
            });
        }
        (_, None, Some(PatchValue::Scalar(Some(value)))) => {
            extension.manager = Some(Manager {
                value: Some(value.clone()),
                ..Manager::default()
            });
        }
        _ => return Ok(PatchOutcome::Ignored),
    }
    Ok(PatchOutcome::Applied)
}
