use crate::domain::WidgetType;

/// Concrete input-control family a widget renders as. The mapping is total
/// over [`WidgetType`] so a renderer can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    TextInput,
    NumberInput,
    EmailInput,
    PasswordInput,
    SingleSelect,
    MultiSelect,
    Checkbox,
    RadioGroup,
    DatePicker,
    DateTimePicker,
    TextArea,
    DataGrid,
    CustomControl,
    Toggle,
    Slider,
    Autocomplete,
    Heading,
    Paragraph,
    Divider,
}

impl ControlKind {
    /// Static controls render fixed content and ignore enabled/required.
    pub fn is_static(self) -> bool {
        matches!(
            self,
            ControlKind::Heading | ControlKind::Paragraph | ControlKind::Divider
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlKind::TextInput => "text_input",
            ControlKind::NumberInput => "number_input",
            ControlKind::EmailInput => "email_input",
            ControlKind::PasswordInput => "password_input",
            ControlKind::SingleSelect => "single_select",
            ControlKind::MultiSelect => "multi_select",
            ControlKind::Checkbox => "checkbox",
            ControlKind::RadioGroup => "radio_group",
            ControlKind::DatePicker => "date_picker",
            ControlKind::DateTimePicker => "datetime_picker",
            ControlKind::TextArea => "text_area",
            ControlKind::DataGrid => "data_grid",
            ControlKind::CustomControl => "custom",
            ControlKind::Toggle => "toggle",
            ControlKind::Slider => "slider",
            ControlKind::Autocomplete => "autocomplete",
            ControlKind::Heading => "heading",
            ControlKind::Paragraph => "paragraph",
            ControlKind::Divider => "divider",
        }
    }
}

/// Pure dispatch from a widget's declared type to its control family.
pub fn control_for(widget_type: WidgetType) -> ControlKind {
    match widget_type {
        WidgetType::Text => ControlKind::TextInput,
        WidgetType::Number => ControlKind::NumberInput,
        WidgetType::Email => ControlKind::EmailInput,
        WidgetType::Password => ControlKind::PasswordInput,
        WidgetType::Select => ControlKind::SingleSelect,
        WidgetType::Multiselect => ControlKind::MultiSelect,
        WidgetType::Checkbox => ControlKind::Checkbox,
        WidgetType::Radio => ControlKind::RadioGroup,
        WidgetType::Date => ControlKind::DatePicker,
        WidgetType::Datetime => ControlKind::DateTimePicker,
        WidgetType::Textarea => ControlKind::TextArea,
        WidgetType::Table => ControlKind::DataGrid,
        WidgetType::Custom => ControlKind::CustomControl,
        WidgetType::Switch => ControlKind::Toggle,
        WidgetType::Slider => ControlKind::Slider,
        WidgetType::Autocomplete => ControlKind::Autocomplete,
        WidgetType::Heading => ControlKind::Heading,
        WidgetType::Paragraph => ControlKind::Paragraph,
        WidgetType::Divider => ControlKind::Divider,
    }
}
