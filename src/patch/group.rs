use crate::filter::{
    Filter, FilterError, FilterResult, FilterTarget, Path, compare_values, matches_any,
};
use crate::patch::apply::{expand_object, ignored, is_required, patch_members, patch_scalar};
use crate::patch::{
    OperationName, PatchError, PatchOperation, PatchOutcome, PatchResult, Patchable,
};
use crate::resource::{Core2Group, Member, ResourceKind};
use crate::schema::identifiers;

impl Patchable for Core2Group {
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

        if path
            .schema_identifier
            .as_deref()
            .is_some_and(|schema| !schema.eq_ignore_ascii_case(identifiers::CORE2_GROUP))
        {
            return ignored(Self::RESOURCE_TYPE, operation);
        }

        match path.attribute_path.to_ascii_lowercase().as_str() {
            "members" if path.sub_attributes.is_empty() && path.value_path.is_none() => {
                patch_members(&mut self.members, operation)
            }
            "members" => self.patch_filtered_members(operation, path),
            _ if !path.sub_attributes.is_empty() || path.value_path.is_some() => {
                ignored(Self::RESOURCE_TYPE, operation)
            }
            "displayname" => patch_scalar(
                &mut self.display_name,
                operation,
                is_required(Self::SCHEMA, "displayName"),
            ),
            "externalid" => patch_scalar(&mut self.resource.external_id, operation, false),
            _ => ignored(Self::RESOURCE_TYPE, operation),
        }
    }
}

impl Core2Group {
    /// `members[...]` and `members[...].display`.
    fn patch_filtered_members(
        &mut self,
        operation: &PatchOperation,
        path: &Path,
    ) -> PatchResult<PatchOutcome> {
        let selected = self
            .members
            .iter()
            .map(|member| matches_any(member, &path.sub_attributes))
            .collect::<FilterResult<Vec<bool>>>()
            .map_err(|error| PatchError::invalid_path(path, error.to_string()))?;

        match (operation.op, path.value_path_name()) {
            (OperationName::Remove, None) => {
                let mut selected = selected.into_iter();
                self.members.retain(|_| !selected.next().unwrap_or(false));
            }
            (_, Some(sub)) if sub.eq_ignore_ascii_case("display") => {
                for (member, selected) in self.members.iter_mut().zip(selected) {
                    if selected {
                        patch_scalar(&mut member.display, operation, false)?;
                    }
                }
            }
            _ => return ignored(Self::RESOURCE_TYPE, operation),
        }
        Ok(PatchOutcome::Applied)
    }
}

impl FilterTarget for Member {
    fn evaluate(&self, filter: &Filter) -> FilterResult<bool> {
        let actual = match filter.attribute_path.to_ascii_lowercase().as_str() {
            "value" => Some(self.value.as_str()),
            "type" => self.kind.as_deref(),
            "display" => self.display.as_deref(),
            "$ref" => self.reference.as_deref(),
            _ => {
                return Err(FilterError::UnsupportedAttributePath {
                    path: filter.attribute_path.clone(),
                });
            }
        };
        match actual {
            Some(actual) => compare_values(filter, actual, false),
            None => Ok(false),
        }
    }
}
