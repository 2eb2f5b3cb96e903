use crate::sarif::model::{ReportingDescriptor, Run, SarifResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleRef<'a> {
    ById(&'a str),
    ByIndex { index: usize, component: usize },
}

pub fn rule_refs(result: &SarifResult) -> Vec<RuleRef<'_>> {
    let reference = result.rule.as_ref();
    let mut refs = Vec::with_capacity(2);

    let id = reference
        .and_then(|r| r.id.as_deref())
        .or(result.rule_id.as_deref())
        .filter(|id| !id.is_empty());
    if let Some(id) = id {
        refs.push(RuleRef::ById(id));
    }

    let index = reference.and_then(|r| r.index).or(result.rule_index);
    let component = reference
        .and_then(|r| r.tool_component.as_ref())
        .and_then(|c| c.index);
    // Negative indices (SARIF uses -1 for "unknown") never resolve.
    if let (Some(Ok(index)), Some(Ok(component))) =
        (index.map(usize::try_from), component.map(usize::try_from))
    {
        refs.push(RuleRef::ByIndex { index, component });
    }

    refs
}

/// An id that matches no driver rule falls through to the positional reference.
pub fn try_get_rule<'r>(run: &'r Run, result: &SarifResult) -> Option<&'r ReportingDescriptor> {
    rule_refs(result)
        .into_iter()
        .find_map(|rule_ref| resolve(run, rule_ref))
}

fn resolve<'r>(run: &'r Run, rule_ref: RuleRef<'_>) -> Option<&'r ReportingDescriptor> {
    match rule_ref {
        RuleRef::ById(id) => run
            .tool
            .driver
            .rules
            .as_deref()?
            .iter()
            .find(|rule| rule.id.as_deref() == Some(id)),
        RuleRef::ByIndex { index, component } => run
            .tool
            .extensions
            .as_deref()?
            .get(component)?
            .rules
            .as_deref()?
            .get(index),
    }
}
